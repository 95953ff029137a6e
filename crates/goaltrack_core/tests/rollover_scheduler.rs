use chrono::NaiveDate;
use goaltrack_core::{
    GoalStore, KvGoalPersistence, ManualClock, MemoryKeyValueStore, NewGoal, Notifier,
    NotifyError, Reminder, RolloverScheduler, SharedGoalStore,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Clone, Default)]
struct SharedNotifier {
    sent: Arc<Mutex<Vec<Reminder>>>,
}

impl SharedNotifier {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for SharedNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(reminder.clone());
        Ok(())
    }
}

type TestStore = SharedGoalStore<KvGoalPersistence<MemoryKeyValueStore>, SharedNotifier, ManualClock>;

fn shared_store(clock: &ManualClock, notifier: &SharedNotifier) -> TestStore {
    Arc::new(Mutex::new(GoalStore::open(
        KvGoalPersistence::new(MemoryKeyValueStore::new()),
        notifier.clone(),
        clock.clone(),
    )))
}

#[tokio::test(start_paused = true)]
async fn first_check_runs_immediately_on_start() {
    let clock = ManualClock::new(date(2024, 1, 1));
    let notifier = SharedNotifier::default();
    let store = shared_store(&clock, &notifier);
    store
        .lock()
        .unwrap()
        .add_goal(NewGoal::new("Read", date(2024, 1, 10)).daily_reset(true))
        .unwrap();

    let handle = RolloverScheduler::new(Duration::from_secs(60)).start(Arc::clone(&store));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        store.lock().unwrap().rollover_marker(),
        Some(date(2024, 1, 1))
    );
    assert_eq!(notifier.count(), 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn day_change_is_picked_up_on_next_tick() {
    let clock = ManualClock::new(date(2024, 1, 1));
    let notifier = SharedNotifier::default();
    let store = shared_store(&clock, &notifier);
    let id = store
        .lock()
        .unwrap()
        .add_goal(NewGoal::new("Read", date(2024, 1, 10)).daily_reset(true))
        .unwrap();

    let handle = RolloverScheduler::new(Duration::from_secs(60)).start(Arc::clone(&store));
    tokio::time::sleep(Duration::from_secs(1)).await;
    store.lock().unwrap().toggle_complete(&id).unwrap();

    // Same day: further ticks leave the completion alone.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(store.lock().unwrap().get_goal(&id).unwrap().is_completed_today);
    assert_eq!(notifier.count(), 1);

    clock.advance_days(1);
    tokio::time::sleep(Duration::from_secs(60)).await;

    {
        let guard = store.lock().unwrap();
        assert!(!guard.get_goal(&id).unwrap().is_completed_today);
        assert_eq!(guard.rollover_marker(), Some(date(2024, 1, 2)));
    }
    assert_eq!(notifier.count(), 2);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stopped_scheduler_runs_no_more_checks() {
    let clock = ManualClock::new(date(2024, 1, 1));
    let notifier = SharedNotifier::default();
    let store = shared_store(&clock, &notifier);

    let handle = RolloverScheduler::new(Duration::from_secs(60)).start(Arc::clone(&store));
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.stop().await;

    clock.advance_days(1);
    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(
        store.lock().unwrap().rollover_marker(),
        Some(date(2024, 1, 1))
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_ends_the_task() {
    let clock = ManualClock::new(date(2024, 1, 1));
    let notifier = SharedNotifier::default();
    let store = shared_store(&clock, &notifier);

    let handle = RolloverScheduler::default().start(store);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.is_finished());

    handle.cancel();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(handle.is_cancelled());
    assert!(handle.is_finished());
}
