//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical goal record and its persisted JSON shape.
//! - Provide the toggle/reset transitions applied by the goal store.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `completion_history` is append-only; entries are never edited or removed.
//! - Every toggle appends exactly one history record, including un-marking.

use crate::model::calendar::days_between;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque goal identifier.
///
/// Fresh ids are random UUIDs, but any non-empty string read back from
/// storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GoalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One toggle event in a goal's completion ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Calendar day on which the toggle happened.
    pub date: NaiveDate,
    /// Completion state the toggle moved the goal into.
    pub completed: bool,
}

/// Canonical goal record.
///
/// Field names serialize in camelCase (`endDate`, `isDailyReset`, ...) to
/// stay compatible with previously saved state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    /// Last calendar day of the goal's pursuit.
    pub end_date: NaiveDate,
    pub is_daily_reset: bool,
    pub is_completed_today: bool,
    pub completion_history: Vec<CompletionRecord>,
}

impl Goal {
    /// Creates a goal from validated form input with a fresh id.
    ///
    /// # Invariants
    /// - `is_completed_today` starts as `false`.
    /// - `completion_history` starts empty.
    pub fn new(input: NewGoal) -> Self {
        Self::with_id(GoalId::generate(), input)
    }

    /// Creates a goal with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: GoalId, input: NewGoal) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            end_date: input.end_date,
            is_daily_reset: input.is_daily_reset,
            is_completed_today: false,
            completion_history: Vec::new(),
        }
    }

    /// Records a toggle on `today` and flips the completion flag.
    pub fn toggle(&mut self, today: NaiveDate) {
        let completed = !self.is_completed_today;
        self.completion_history.push(CompletionRecord {
            date: today,
            completed,
        });
        self.is_completed_today = completed;
    }

    /// Clears today's completion flag. History is left untouched.
    pub fn reset_today(&mut self) {
        self.is_completed_today = false;
    }

    /// Whole days left until `end_date`, negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        days_between(today, self.end_date)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.days_remaining(today) < 0
    }
}

/// Form input for creating a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub end_date: NaiveDate,
    pub is_daily_reset: bool,
}

impl NewGoal {
    pub fn new(title: impl Into<String>, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            end_date,
            is_daily_reset: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn daily_reset(mut self, is_daily_reset: bool) -> Self {
        self.is_daily_reset = is_daily_reset;
        self
    }

    /// Validates caller input before it becomes a goal.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is empty or whitespace only.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Rejection reasons for goal form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyTitle,
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title cannot be empty"),
        }
    }
}

impl Error for GoalValidationError {}

/// Read-only projection used by list renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalView<'a> {
    pub goal: &'a Goal,
    pub days_remaining: i64,
    /// Expired goals render de-emphasized and cannot be toggled.
    pub is_expired: bool,
}

impl<'a> GoalView<'a> {
    pub fn new(goal: &'a Goal, today: NaiveDate) -> Self {
        let days_remaining = goal.days_remaining(today);
        Self {
            goal,
            days_remaining,
            is_expired: days_remaining < 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Goal, GoalId, GoalValidationError, NewGoal};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn toggle_appends_record_for_each_flip() {
        let mut goal = Goal::new(NewGoal::new("Read", date(2024, 1, 10)));

        goal.toggle(date(2024, 1, 1));
        goal.toggle(date(2024, 1, 1));

        assert!(!goal.is_completed_today);
        assert_eq!(goal.completion_history.len(), 2);
        assert!(goal.completion_history[0].completed);
        assert!(!goal.completion_history[1].completed);
    }

    #[test]
    fn reset_today_keeps_history() {
        let mut goal = Goal::new(NewGoal::new("Read", date(2024, 1, 10)));
        goal.toggle(date(2024, 1, 1));

        goal.reset_today();

        assert!(!goal.is_completed_today);
        assert_eq!(goal.completion_history.len(), 1);
    }

    #[test]
    fn expiry_starts_the_day_after_end_date() {
        let goal = Goal::with_id(
            GoalId::from("g-1"),
            NewGoal::new("Read", date(2024, 1, 10)),
        );

        assert_eq!(goal.days_remaining(date(2024, 1, 1)), 9);
        assert!(!goal.is_expired(date(2024, 1, 10)));
        assert!(goal.is_expired(date(2024, 1, 11)));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let input = NewGoal::new("   ", date(2024, 1, 10));
        assert_eq!(input.validate(), Err(GoalValidationError::EmptyTitle));
    }
}
