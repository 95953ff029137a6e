//! Goal store: the only owner of mutable goal state.
//!
//! # Responsibility
//! - Hold the in-memory goal list and the last applied rollover date.
//! - Apply add/toggle/delete/rollover transitions and persist after each.
//! - Emit daily reminders when a new calendar day is observed.
//!
//! # Invariants
//! - Goal ids are unique within the store.
//! - Every state-changing operation ends with an explicit save; no-op calls
//!   (unknown id, same-day rollover) do not write.
//! - Rollover is applied at most once per calendar date. The in-memory
//!   marker only advances after the reset goal list was saved; a failed
//!   marker write is retried alone on the next check.
//! - Reminder delivery failures never fail a rollover.

use crate::clock::Clock;
use crate::model::goal::{Goal, GoalId, GoalValidationError, GoalView, NewGoal};
use crate::notify::{Notifier, Reminder};
use crate::repo::goal_codec::GoalPersistence;
use crate::repo::kv_repo::RepoError;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by goal store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Caller input was rejected before any state changed.
    Validation(GoalValidationError),
    /// In-memory state changed but could not be persisted.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "failed to persist goals: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<GoalValidationError> for StoreError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Which goals have their completion flag cleared on a new day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolloverPolicy {
    /// Clear every goal, daily-reset or not. Matches previously shipped behavior.
    #[default]
    ResetAll,
    /// Clear only goals flagged `is_daily_reset`.
    DailyResetOnly,
}

impl RolloverPolicy {
    fn applies_to(self, goal: &Goal) -> bool {
        match self {
            Self::ResetAll => true,
            Self::DailyResetOnly => goal.is_daily_reset,
        }
    }
}

/// Result of one rollover check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The marker already equals `date`; nothing changed.
    AlreadyApplied { date: NaiveDate },
    /// A new day was observed and the rollover ran.
    Applied {
        date: NaiveDate,
        /// Goals whose completion flag was cleared.
        reset: usize,
        /// Reminders handed to the notifier successfully.
        reminded: usize,
    },
}

/// In-memory goal list with injected persistence, notification and clock.
pub struct GoalStore<P, N, C> {
    goals: Vec<Goal>,
    last_rollover: Option<NaiveDate>,
    /// `last_rollover` is ahead of the stored marker.
    marker_pending: bool,
    policy: RolloverPolicy,
    persistence: P,
    notifier: N,
    clock: C,
}

impl<P, N, C> GoalStore<P, N, C>
where
    P: GoalPersistence,
    N: Notifier,
    C: Clock,
{
    /// Restores goal state with the default rollover policy.
    pub fn open(persistence: P, notifier: N, clock: C) -> Self {
        Self::open_with_policy(persistence, notifier, clock, RolloverPolicy::default())
    }

    /// Restores goal state from `persistence`.
    ///
    /// Loading never fails; unreadable state starts an empty store. Duplicate
    /// ids in stored data keep their first occurrence.
    pub fn open_with_policy(persistence: P, notifier: N, clock: C, policy: RolloverPolicy) -> Self {
        let started_at = Instant::now();
        let loaded = persistence.load_goals();
        let loaded_count = loaded.len();
        let goals = dedupe_by_id(loaded);
        if goals.len() != loaded_count {
            warn!(
                "event=store_open module=store status=degraded error_code=duplicate_ids dropped={}",
                loaded_count - goals.len()
            );
        }
        let last_rollover = persistence.load_rollover_marker();

        info!(
            "event=store_open module=store status=ok goals={} has_marker={} policy={:?} duration_ms={}",
            goals.len(),
            last_rollover.is_some(),
            policy,
            started_at.elapsed().as_millis()
        );

        Self {
            goals,
            last_rollover,
            marker_pending: false,
            policy,
            persistence,
            notifier,
            clock,
        }
    }

    /// Goals in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get_goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| &goal.id == id)
    }

    /// Date of the last applied rollover, if any.
    pub fn rollover_marker(&self) -> Option<NaiveDate> {
        self.last_rollover
    }

    pub fn policy(&self) -> RolloverPolicy {
        self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// List projections with days remaining relative to today.
    pub fn views(&self) -> Vec<GoalView<'_>> {
        let today = self.clock.today();
        self.goals
            .iter()
            .map(|goal| GoalView::new(goal, today))
            .collect()
    }

    /// Creates a goal at the end of the list and persists the list.
    ///
    /// # Errors
    /// - `Validation` when the input is rejected; nothing is stored.
    /// - `Repo` when the save fails; the goal stays in memory.
    pub fn add_goal(&mut self, input: NewGoal) -> StoreResult<GoalId> {
        input.validate()?;

        let mut goal = Goal::new(input);
        while self.get_goal(&goal.id).is_some() {
            goal.id = GoalId::generate();
        }
        let id = goal.id.clone();
        self.goals.push(goal);

        info!(
            "event=goal_add module=store status=ok goal_id={} count={}",
            id,
            self.goals.len()
        );
        self.persist("goal_add")?;
        Ok(id)
    }

    /// Marks or un-marks a goal for today and appends one history record.
    ///
    /// Returns `false` without saving when no goal has `id`.
    pub fn toggle_complete(&mut self, id: &GoalId) -> StoreResult<bool> {
        let today = self.clock.today();
        let Some(goal) = self.goals.iter_mut().find(|goal| &goal.id == id) else {
            debug!("event=goal_toggle module=store status=noop goal_id={}", id);
            return Ok(false);
        };

        goal.toggle(today);
        info!(
            "event=goal_toggle module=store status=ok goal_id={} completed={} history_len={}",
            id,
            goal.is_completed_today,
            goal.completion_history.len()
        );
        self.persist("goal_toggle")?;
        Ok(true)
    }

    /// Removes a goal and its history.
    ///
    /// Returns `false` without saving when no goal has `id`.
    pub fn delete_goal(&mut self, id: &GoalId) -> StoreResult<bool> {
        let Some(index) = self.goals.iter().position(|goal| &goal.id == id) else {
            debug!("event=goal_delete module=store status=noop goal_id={}", id);
            return Ok(false);
        };

        self.goals.remove(index);
        info!(
            "event=goal_delete module=store status=ok goal_id={} count={}",
            id,
            self.goals.len()
        );
        self.persist("goal_delete")?;
        Ok(true)
    }

    /// Applies the daily rollover if today differs from the stored marker.
    ///
    /// # Errors
    /// - `Repo` when saving goals fails. The marker is left unchanged so the
    ///   next check retries the rollover.
    /// - `Repo` when only the marker write fails. The rollover counts as
    ///   applied (goals reset, reminders sent); later checks on the same day
    ///   retry just the marker write.
    pub fn check_rollover(&mut self) -> StoreResult<RolloverOutcome> {
        let today = self.clock.today();
        if self.last_rollover == Some(today) {
            if self.marker_pending {
                self.save_marker(today)?;
            }
            return Ok(RolloverOutcome::AlreadyApplied { date: today });
        }

        let policy = self.policy;
        let mut reset = 0;
        for goal in self.goals.iter_mut().filter(|goal| policy.applies_to(goal)) {
            goal.reset_today();
            reset += 1;
        }

        self.persist("rollover")?;
        let previous = self.last_rollover.replace(today);
        self.marker_pending = true;

        let reminded = self.send_daily_reminders();
        info!(
            "event=rollover module=store status=ok date={} previous={} reset={} reminded={}",
            today,
            previous.map_or_else(|| "none".to_string(), |date| date.to_string()),
            reset,
            reminded
        );

        self.save_marker(today)?;
        Ok(RolloverOutcome::Applied {
            date: today,
            reset,
            reminded,
        })
    }

    /// Whether the applied rollover date still has to reach persistence.
    pub fn has_pending_marker(&self) -> bool {
        self.marker_pending
    }

    fn save_marker(&mut self, date: NaiveDate) -> StoreResult<()> {
        if let Err(err) = self.persistence.save_rollover_marker(date) {
            error!(
                "event=rollover module=store status=error error_code=marker_save_failed date={} error={}",
                date, err
            );
            return Err(err.into());
        }
        self.marker_pending = false;
        Ok(())
    }

    fn send_daily_reminders(&self) -> usize {
        let mut delivered = 0;
        for goal in self.goals.iter().filter(|goal| goal.is_daily_reset) {
            match self.notifier.notify(&Reminder::for_goal(&goal.title)) {
                Ok(()) => delivered += 1,
                Err(err) => warn!(
                    "event=reminder_emit module=store status=skipped goal_id={} error={}",
                    goal.id, err
                ),
            }
        }
        delivered
    }

    fn persist(&self, event: &str) -> StoreResult<()> {
        if let Err(err) = self.persistence.save_goals(&self.goals) {
            error!(
                "event={} module=store status=error error_code=save_failed error={}",
                event, err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

fn dedupe_by_id(goals: Vec<Goal>) -> Vec<Goal> {
    let mut seen = HashSet::new();
    goals
        .into_iter()
        .filter(|goal| seen.insert(goal.id.clone()))
        .collect()
}
