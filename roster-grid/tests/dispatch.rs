use std::time::Duration;
use std::time::Instant;

use roster_grid::DispatchMode;
use roster_grid::DispatchScheduler;
use roster_grid::FilterStore;
use roster_grid::dispatch::QUIET_PERIOD;
use roster_lib::filter::FilterValue;
use roster_lib::model::FilterKind;

#[test]
fn test_only_last_edit_within_quiet_period_is_dispatched() {
    let start = Instant::now();
    let mut store = FilterStore::new();
    let mut scheduler = DispatchScheduler::new(DispatchMode::Remote);
    let mut dispatched = Vec::new();

    for (offset, text) in [(0, "김"), (100, "김철"), (250, "김철수")] {
        let now = start + Duration::from_millis(offset);
        let change = store.set_input("name", FilterKind::Text, text);
        assert_eq!(scheduler.schedule(change.state, now), None);
        dispatched.extend(scheduler.poll(now));
    }

    assert!(dispatched.is_empty());
    assert_eq!(
        scheduler.deadline(),
        Some(start + Duration::from_millis(250) + QUIET_PERIOD)
    );

    assert_eq!(scheduler.poll(start + Duration::from_millis(500)), None);
    let fired = scheduler.poll(start + Duration::from_millis(550));
    assert_eq!(
        fired.and_then(|state| state.get("name").cloned()),
        Some(FilterValue::text("김철수"))
    );
    assert!(!scheduler.is_pending());
    assert_eq!(scheduler.poll(start + Duration::from_secs(5)), None);
}

#[test]
fn test_separate_bursts_dispatch_separately() {
    let start = Instant::now();
    let mut scheduler = DispatchScheduler::new(DispatchMode::Remote)
        .with_quiet_period(Duration::from_millis(50));
    let mut store = FilterStore::new();

    let first = store.set_input("age", FilterKind::Number, "30");
    scheduler.schedule(first.state, start);
    assert!(scheduler.poll(start + Duration::from_millis(60)).is_some());

    let second = store.set_input("age", FilterKind::Number, "35");
    scheduler.schedule(second.state, start + Duration::from_millis(100));
    let fired = scheduler.poll(start + Duration::from_millis(150));
    assert_eq!(
        fired.and_then(|state| state.get("age").cloned()),
        Some(FilterValue::Number(35.0))
    );
}
