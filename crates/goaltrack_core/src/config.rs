//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, logging and rollover settings from the
//!   environment, with defaults for every field.
//!
//! # Invariants
//! - Empty environment values are treated as unset.
//! - Resolution never touches the file system.

use crate::logging::default_log_level;
use crate::service::goal_store::RolloverPolicy;
use crate::service::rollover_scheduler::DEFAULT_ROLLOVER_INTERVAL;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "GOALTRACK_DB_PATH";
pub const ENV_LOG_DIR: &str = "GOALTRACK_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "GOALTRACK_LOG_LEVEL";
pub const ENV_ROLLOVER_SECS: &str = "GOALTRACK_ROLLOVER_SECS";
pub const ENV_RESET_SCOPE: &str = "GOALTRACK_RESET_SCOPE";

const DEFAULT_DB_FILE_NAME: &str = "goaltrack.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one goal tracker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// SQLite file holding goal state.
    pub db_path: PathBuf,
    /// Directory for rolling log files; file logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub rollover_interval: Duration,
    pub rollover_policy: RolloverPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
            rollover_interval: DEFAULT_ROLLOVER_INTERVAL,
            rollover_policy: RolloverPolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Reads `GOALTRACK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(raw) = read(ENV_ROLLOVER_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_ROLLOVER_SECS,
                    value: raw.clone(),
                    expected: "a positive number of seconds",
                })?;
            config.rollover_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = read(ENV_RESET_SCOPE) {
            config.rollover_policy = parse_reset_scope(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_RESET_SCOPE,
                value: raw.clone(),
                expected: "all|daily",
            })?;
        }

        Ok(config)
    }
}

/// Parses the user-facing reset scope name.
pub fn parse_reset_scope(value: &str) -> Option<RolloverPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "all" => Some(RolloverPolicy::ResetAll),
        "daily" | "daily-only" => Some(RolloverPolicy::DailyResetOnly),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, TrackerConfig, ENV_DB_PATH, ENV_RESET_SCOPE, ENV_ROLLOVER_SECS,
    };
    use crate::service::goal_store::RolloverPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.rollover_interval, Duration::from_secs(60));
        assert_eq!(config.rollover_policy, RolloverPolicy::ResetAll);
    }

    #[test]
    fn overrides_are_applied_and_blank_values_ignored() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/var/lib/goaltrack/goals.db"),
            (ENV_ROLLOVER_SECS, "300"),
            (ENV_RESET_SCOPE, " Daily "),
            ("GOALTRACK_LOG_DIR", "   "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/goaltrack/goals.db"));
        assert_eq!(config.rollover_interval, Duration::from_secs(300));
        assert_eq!(config.rollover_policy, RolloverPolicy::DailyResetOnly);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = TrackerConfig::from_lookup(lookup(&[(ENV_ROLLOVER_SECS, "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_ROLLOVER_SECS,
                ..
            }
        ));
    }
}
