//! Core domain logic for the goal tracker.
//! This crate is the single source of truth for goal lifecycle and daily
//! rollover invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{CompletionRecord, Goal, GoalId, GoalValidationError, GoalView, NewGoal};
pub use notify::{LogNotifier, Notifier, NotifyError, Reminder, REMINDER_TITLE};
pub use repo::goal_codec::{GoalPersistence, KvGoalPersistence, GOALS_KEY, ROLLOVER_MARKER_KEY};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use service::goal_store::{
    GoalStore, RolloverOutcome, RolloverPolicy, StoreError, StoreResult,
};
pub use service::rollover_scheduler::{
    RolloverHandle, RolloverScheduler, SharedGoalStore, DEFAULT_ROLLOVER_INTERVAL,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
