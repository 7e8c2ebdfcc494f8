//! Rollups over recorded history.

use crate::in_memory::helpers::store;
use crate::test_helpers::{FixedClock, at_secs, entry, guid};
use chrono::DateTime;
use rstest::rstest;
use server_tracker::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::StatusSample,
    ports::{ServerRepository, StatusRepository},
    services::UptimeAggregator,
};
use std::sync::Arc;
use std::time::Duration;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_up_and_one_down_on_the_same_day_is_half_uptime(store: Arc<InMemoryTrackerStore>) {
    store
        .reconcile(&[entry("s1", "Server one", 9000)], at_secs(0))
        .await
        .expect("reconcile");
    let server = store
        .find_by_guid(&guid("s1"))
        .await
        .expect("lookup")
        .expect("present");
    store
        .record(StatusSample::up(server.id(), at_secs(1_000), Duration::from_millis(80)))
        .await
        .expect("record up");
    store
        .record(StatusSample::down(server.id(), at_secs(2_000), "receive timed out"))
        .await
        .expect("record down");

    let noon = DateTime::from_timestamp(43_200, 0).expect("noon");
    let window = UptimeAggregator::new(Arc::clone(&store), Arc::new(FixedClock::at(noon)))
        .rolling_window(server.id())
        .await
        .expect("window");

    let today = window.last().expect("today");
    assert!((today.uptime_percent() - 50.0).abs() < f64::EPSILON);
    assert_eq!(today.samples(), 2);
    assert_eq!(today.rtt_min_label(), "80");
    assert_eq!(window.iter().map(|day| day.samples()).sum::<u32>(), 2);
}
