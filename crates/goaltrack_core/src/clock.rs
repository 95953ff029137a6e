//! Calendar clock seam.
//!
//! # Responsibility
//! - Answer "what local calendar day is it" for toggle and rollover logic.
//!
//! # Invariants
//! - `today()` never carries a time component.

use chrono::{Days, Local, NaiveDate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Source of the current local calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock shared between clones.
///
/// Lets tests and replay tools move the calendar forward while a store or
/// scheduler holds its own handle.
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: Arc<Mutex<NaiveDate>>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(Mutex::new(today)),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.lock() = today;
    }

    /// Moves the clock by `days` calendar days, saturating at the ends of
    /// the supported date range.
    pub fn advance_days(&self, days: i32) {
        let mut today = self.lock();
        let step = Days::new(u64::from(days.unsigned_abs()));
        *today = if days >= 0 {
            today.checked_add_days(step).unwrap_or(NaiveDate::MAX)
        } else {
            today.checked_sub_days(step).unwrap_or(NaiveDate::MIN)
        };
    }

    fn lock(&self) -> MutexGuard<'_, NaiveDate> {
        self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.lock()
    }
}
