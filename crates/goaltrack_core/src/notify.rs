//! Daily reminder notifications.
//!
//! # Responsibility
//! - Describe the reminder emitted for daily-reset goals on a new day.
//! - Define the delivery seam used by the goal store.
//!
//! # Invariants
//! - Delivery is best-effort; callers must never fail a rollover because a
//!   notifier returned an error.
//! - Reminders carry the goal title in their body, so notifier
//!   implementations must not write them to log files.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title shown on every daily reminder.
pub const REMINDER_TITLE: &str = "Daily Goal Reminder";

/// User-visible reminder for one daily-reset goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    /// Whether the reminder should be accompanied by an audible alert.
    pub audible: bool,
}

impl Reminder {
    pub fn for_goal(goal_title: &str) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: format!("Don't forget to work on \"{goal_title}\" today."),
            audible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The user has not granted notification permission.
    PermissionDenied,
    /// No notification channel is available on this host.
    Unavailable(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission denied"),
            Self::Unavailable(reason) => write!(f, "notification channel unavailable: {reason}"),
        }
    }
}

impl Error for NotifyError {}

/// Delivery channel for reminders.
pub trait Notifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        (**self).notify(reminder)
    }
}

/// Notifier for headless runs: records that a reminder fired, without its text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        info!(
            "event=reminder_emit module=notify status=ok audible={} body_len={}",
            reminder.audible,
            reminder.body.chars().count()
        );
        Ok(())
    }
}
