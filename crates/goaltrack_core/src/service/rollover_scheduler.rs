//! Recurring rollover check.
//!
//! # Responsibility
//! - Run `GoalStore::check_rollover` on startup and then on a fixed cadence.
//! - Give the owning component an explicit start/stop lifecycle.
//!
//! # Invariants
//! - The first check runs immediately after `start`.
//! - Each check holds the store lock for its whole duration, so it never
//!   interleaves with user mutations.
//! - Check failures are logged; they never end the loop.
//! - After `stop` returns, no further check runs.
//! - Dropping the handle also stops the task.

use crate::clock::Clock;
use crate::notify::Notifier;
use crate::repo::goal_codec::GoalPersistence;
use crate::service::goal_store::{GoalStore, RolloverOutcome};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Reference cadence for rollover checks.
pub const DEFAULT_ROLLOVER_INTERVAL: Duration = Duration::from_secs(60);

const MIN_ROLLOVER_INTERVAL: Duration = Duration::from_secs(1);
const MAX_ROLLOVER_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Goal store shared between the scheduler and user-facing callers.
pub type SharedGoalStore<P, N, C> = Arc<Mutex<GoalStore<P, N, C>>>;

/// Builder for the background rollover task.
#[derive(Debug, Clone, Copy)]
pub struct RolloverScheduler {
    interval: Duration,
}

impl Default for RolloverScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOVER_INTERVAL)
    }
}

impl RolloverScheduler {
    /// Creates a scheduler; `interval` is clamped to `[1s, 24h]` so a day
    /// boundary is never skipped.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.clamp(MIN_ROLLOVER_INTERVAL, MAX_ROLLOVER_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the check loop on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn start<P, N, C>(&self, store: SharedGoalStore<P, N, C>) -> RolloverHandle
    where
        P: GoalPersistence + Send + 'static,
        N: Notifier + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.interval;

        info!(
            "event=rollover_scheduler module=scheduler status=start interval_ms={}",
            interval.as_millis()
        );

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => run_check(&store),
                }
            }
            info!("event=rollover_scheduler module=scheduler status=stopped");
        });

        RolloverHandle { shutdown_tx, join }
    }
}

/// Lifecycle handle of a running rollover task.
#[derive(Debug)]
pub struct RolloverHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl RolloverHandle {
    /// Signals the task to exit without waiting for it.
    pub fn cancel(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn stop(self) {
        self.cancel();
        if let Err(err) = self.join.await {
            warn!(
                "event=rollover_scheduler module=scheduler status=error error_code=join_failed error={}",
                err
            );
        }
    }
}

fn run_check<P, N, C>(store: &SharedGoalStore<P, N, C>)
where
    P: GoalPersistence,
    N: Notifier,
    C: Clock,
{
    let mut guard = store.lock().unwrap_or_else(|poisoned| {
        warn!("event=rollover_check module=scheduler status=recovered error_code=lock_poisoned");
        PoisonError::into_inner(poisoned)
    });

    match guard.check_rollover() {
        Ok(RolloverOutcome::AlreadyApplied { date }) => {
            debug!(
                "event=rollover_check module=scheduler status=noop date={}",
                date
            );
        }
        Ok(RolloverOutcome::Applied {
            date,
            reset,
            reminded,
        }) => {
            info!(
                "event=rollover_check module=scheduler status=applied date={} reset={} reminded={}",
                date, reset, reminded
            );
        }
        Err(err) => {
            error!(
                "event=rollover_check module=scheduler status=error error={}",
                err
            );
        }
    }
}
