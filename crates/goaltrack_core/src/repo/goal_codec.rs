//! Goal list and rollover marker persistence codec.
//!
//! # Responsibility
//! - Serialize the full goal list as JSON under `tasks`.
//! - Store the last rollover date as plain text under `lastChecked`.
//!
//! # Invariants
//! - `save_goals` always writes the whole list, replacing the prior value.
//! - `load_goals` is fail-soft: missing, unreadable or malformed state
//!   yields an empty list and a warning, never an error.

use crate::model::calendar::{format_marker, parse_marker};
use crate::model::goal::Goal;
use crate::repo::kv_repo::{KeyValueStore, RepoResult};
use chrono::NaiveDate;
use log::{debug, warn};

/// Key holding the JSON-encoded goal array.
pub const GOALS_KEY: &str = "tasks";
/// Key holding the last applied rollover date.
pub const ROLLOVER_MARKER_KEY: &str = "lastChecked";

/// Persistence contract consumed by the goal store.
pub trait GoalPersistence {
    /// Returns the saved goal list, or an empty list when nothing usable is stored.
    fn load_goals(&self) -> Vec<Goal>;
    fn save_goals(&self, goals: &[Goal]) -> RepoResult<()>;
    /// Returns the last applied rollover date, if a readable one is stored.
    fn load_rollover_marker(&self) -> Option<NaiveDate>;
    fn save_rollover_marker(&self, date: NaiveDate) -> RepoResult<()>;
}

impl<T: GoalPersistence + ?Sized> GoalPersistence for &T {
    fn load_goals(&self) -> Vec<Goal> {
        (**self).load_goals()
    }

    fn save_goals(&self, goals: &[Goal]) -> RepoResult<()> {
        (**self).save_goals(goals)
    }

    fn load_rollover_marker(&self) -> Option<NaiveDate> {
        (**self).load_rollover_marker()
    }

    fn save_rollover_marker(&self, date: NaiveDate) -> RepoResult<()> {
        (**self).save_rollover_marker(date)
    }
}

/// JSON codec over any string-keyed store.
#[derive(Debug, Clone)]
pub struct KvGoalPersistence<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> KvGoalPersistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

impl<K: KeyValueStore> GoalPersistence for KvGoalPersistence<K> {
    fn load_goals(&self) -> Vec<Goal> {
        let raw = match self.store.get(GOALS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=goals_load module=codec status=degraded error_code=read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match decode_goals(&raw) {
            Ok(goals) => {
                debug!(
                    "event=goals_load module=codec status=ok count={}",
                    goals.len()
                );
                goals
            }
            Err(err) => {
                warn!(
                    "event=goals_load module=codec status=degraded error_code=parse_failed bytes={} error={}",
                    raw.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save_goals(&self, goals: &[Goal]) -> RepoResult<()> {
        let encoded = encode_goals(goals)?;
        self.store.set(GOALS_KEY, &encoded)
    }

    fn load_rollover_marker(&self) -> Option<NaiveDate> {
        let raw = match self.store.get(ROLLOVER_MARKER_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(
                    "event=marker_load module=codec status=degraded error_code=read_failed error={}",
                    err
                );
                return None;
            }
        };

        let parsed = parse_marker(&raw);
        if parsed.is_none() {
            warn!("event=marker_load module=codec status=degraded error_code=parse_failed");
        }
        parsed
    }

    fn save_rollover_marker(&self, date: NaiveDate) -> RepoResult<()> {
        self.store.set(ROLLOVER_MARKER_KEY, &format_marker(date))
    }
}

/// Encodes a goal list into its persisted JSON form.
pub fn encode_goals(goals: &[Goal]) -> RepoResult<String> {
    Ok(serde_json::to_string(goals)?)
}

/// Decodes a persisted JSON goal list.
pub fn decode_goals(raw: &str) -> RepoResult<Vec<Goal>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::{GoalPersistence, KvGoalPersistence, GOALS_KEY, ROLLOVER_MARKER_KEY};
    use crate::model::goal::{Goal, NewGoal};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn load_goals_falls_back_to_empty_on_garbage() {
        let kv = MemoryKeyValueStore::new();
        kv.set(GOALS_KEY, "{not json").unwrap();
        let persistence = KvGoalPersistence::new(kv);

        assert!(persistence.load_goals().is_empty());
    }

    #[test]
    fn load_goals_is_empty_when_nothing_saved() {
        let persistence = KvGoalPersistence::new(MemoryKeyValueStore::new());
        assert!(persistence.load_goals().is_empty());
        assert_eq!(persistence.load_rollover_marker(), None);
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let persistence = KvGoalPersistence::new(MemoryKeyValueStore::new());
        let mut first = Goal::new(NewGoal::new("Read", date(2024, 1, 10)).daily_reset(true));
        first.toggle(date(2024, 1, 1));
        let second = Goal::new(NewGoal::new("Run", date(2024, 2, 1)).description("5k"));
        let goals = vec![first, second];

        persistence.save_goals(&goals).unwrap();

        assert_eq!(persistence.load_goals(), goals);
    }

    #[test]
    fn marker_is_stored_as_date_string() {
        let kv = MemoryKeyValueStore::new();
        let persistence = KvGoalPersistence::new(kv.clone());

        persistence.save_rollover_marker(date(2024, 1, 2)).unwrap();

        assert_eq!(
            kv.get(ROLLOVER_MARKER_KEY).unwrap().as_deref(),
            Some("Tue Jan 02 2024")
        );
        assert_eq!(persistence.load_rollover_marker(), Some(date(2024, 1, 2)));
    }

    #[test]
    fn unreadable_marker_is_treated_as_absent() {
        let kv = MemoryKeyValueStore::new();
        kv.set(ROLLOVER_MARKER_KEY, "someday").unwrap();
        let persistence = KvGoalPersistence::new(kv);

        assert_eq!(persistence.load_rollover_marker(), None);
    }
}
