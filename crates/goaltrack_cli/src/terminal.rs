//! Terminal rendering and reminder delivery.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use goaltrack_core::{GoalView, Notifier, NotifyError, Reminder};
use std::io::{self, Write};

const BELL: char = '\u{7}';
const SHORT_ID_LEN: usize = 8;

/// Prints reminders to stdout, ringing the terminal bell for audible ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        let mut out = io::stdout().lock();
        let bell = if reminder.audible {
            BELL.to_string()
        } else {
            String::new()
        };
        writeln!(out, "{bell}{}: {}", reminder.title, reminder.body)
            .and_then(|()| out.flush())
            .map_err(|err| NotifyError::Unavailable(err.to_string()))
    }
}

/// Renders one goal as list lines.
pub fn render_goal(view: &GoalView<'_>) -> String {
    let goal = view.goal;
    let mark = if goal.is_completed_today { "[x]" } else { "[ ]" };
    let remaining = if view.is_expired {
        "expired".to_string()
    } else {
        match view.days_remaining {
            1 => "1 day left".to_string(),
            days => format!("{days} days left"),
        }
    };
    let daily = if goal.is_daily_reset { "  daily reset" } else { "" };

    let mut rendered = format!(
        "{mark} {}  ({})  ends {}  {remaining}{daily}",
        goal.title,
        short_id(goal.id.as_str()),
        format_end_date(goal.end_date),
    );
    if !goal.description.is_empty() {
        rendered.push_str("\n    ");
        rendered.push_str(&goal.description);
    }
    rendered
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((index, _)) => &id[..index],
        None => id,
    }
}

fn format_end_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Expired goals are shown but can no longer be toggled.
pub fn ensure_toggleable(view: &GoalView<'_>) -> Result<()> {
    if view.is_expired {
        bail!(
            "goal {} has expired and can no longer be toggled",
            view.goal.id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_toggleable, render_goal, short_id};
    use chrono::NaiveDate;
    use goaltrack_core::{Goal, GoalId, GoalView, NewGoal};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn render_shows_days_left_and_daily_flag() {
        let goal = Goal::with_id(
            GoalId::from("0123456789abcdef"),
            NewGoal::new("Read", date(2024, 1, 10)).daily_reset(true),
        );
        let rendered = render_goal(&GoalView::new(&goal, date(2024, 1, 1)));

        assert_eq!(
            rendered,
            "[ ] Read  (01234567)  ends January 10, 2024  9 days left  daily reset"
        );
    }

    #[test]
    fn toggle_is_allowed_through_the_end_date() {
        let goal = Goal::with_id(
            GoalId::from("g1"),
            NewGoal::new("Run", date(2024, 1, 10)),
        );

        assert!(ensure_toggleable(&GoalView::new(&goal, date(2024, 1, 1))).is_ok());
        assert!(ensure_toggleable(&GoalView::new(&goal, date(2024, 1, 10))).is_ok());
    }

    #[test]
    fn toggle_is_refused_after_the_end_date() {
        let goal = Goal::with_id(
            GoalId::from("g1"),
            NewGoal::new("Run", date(2024, 1, 10)),
        );

        let err = ensure_toggleable(&GoalView::new(&goal, date(2024, 1, 11))).unwrap_err();

        assert!(err.to_string().contains("expired"));
        assert!(err.to_string().contains("g1"));
    }

    #[test]
    fn render_marks_expired_goals() {
        let goal = Goal::with_id(
            GoalId::from("g1"),
            NewGoal::new("Run", date(2024, 1, 10)).description("5k"),
        );
        let rendered = render_goal(&GoalView::new(&goal, date(2024, 1, 12)));

        assert!(rendered.contains("expired"));
        assert!(rendered.ends_with("\n    5k"));
    }

    #[test]
    fn short_id_keeps_short_ids_whole() {
        assert_eq!(short_id("xyz"), "xyz");
    }
}
