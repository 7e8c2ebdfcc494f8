//! Grouped per-day queries and rollups against `SQLite`.

use crate::sqlite::helpers::{seed_one, store};
use crate::test_helpers::{FixedClock, at_secs};
use chrono::{DateTime, NaiveDate, Utc};
use rstest::rstest;
use server_tracker::tracker::{
    adapters::sqlite::SqliteTrackerStore,
    domain::{StatusSample, UptimeClass},
    ports::StatusRepository,
    services::UptimeAggregator,
};
use std::sync::Arc;
use std::time::Duration;

fn instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn date(value: &str) -> NaiveDate {
    value.parse().expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_up_and_one_down_on_the_same_day_is_half_uptime(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;
    store
        .record(StatusSample::up(id, at_secs(1_000), Duration::from_millis(20)))
        .await
        .expect("record up");
    store
        .record(StatusSample::down(id, at_secs(2_000), "timed out"))
        .await
        .expect("record down");

    let window = UptimeAggregator::new(
        Arc::clone(&store),
        Arc::new(FixedClock::at(at_secs(43_200))),
    )
    .rolling_window(id)
    .await
    .expect("window");

    assert_eq!(window.len(), 15);
    let today = window.last().expect("today");
    assert_eq!(today.day(), date("1970-01-01"));
    assert!((today.uptime_percent() - 50.0).abs() < f64::EPSILON);
    assert_eq!(today.samples(), 2);
    assert_eq!(today.class(), UptimeClass::Mid);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_samples_group_by_utc_day(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;
    let samples = [
        StatusSample::up(id, instant("2026-03-01T23:59:59Z"), Duration::from_millis(5)),
        StatusSample::up(id, instant("2026-03-02T00:00:00Z"), Duration::from_millis(10)),
        StatusSample::up(id, instant("2026-03-02T11:00:00Z"), Duration::from_millis(11)),
        StatusSample::down(id, instant("2026-03-02T12:00:00Z"), "timed out"),
        StatusSample::down(id, instant("2026-03-03T08:00:00Z"), "timed out"),
    ];
    for sample in samples {
        store.record(sample).await.expect("record");
    }

    let days = store
        .daily_samples(id, date("2026-03-02"), date("2026-03-04"))
        .await
        .expect("samples");

    assert_eq!(days.len(), 2);
    let [busy, quiet] = days.as_slice() else {
        panic!("two days expected");
    };
    assert_eq!(busy.day, date("2026-03-02"));
    assert_eq!((busy.total, busy.up), (3, 2));
    let rtt = busy.rtt.expect("rtt stats");
    assert_eq!((rtt.min_ms, rtt.max_ms), (10, 11));
    assert!((rtt.mean_ms - 10.5).abs() < f64::EPSILON);
    assert_eq!(quiet.day, date("2026-03-03"));
    assert_eq!((quiet.total, quiet.up), (1, 0));
    assert_eq!(quiet.rtt, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn calendar_grid_covers_every_day(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;
    store
        .record(StatusSample::up(
            id,
            instant("2026-10-16T09:00:00Z"),
            Duration::from_millis(12),
        ))
        .await
        .expect("record");

    let grid = UptimeAggregator::new(
        Arc::clone(&store),
        Arc::new(FixedClock::at(instant("2026-10-16T12:00:00Z"))),
    )
    .calendar_grid(id)
    .await
    .expect("grid");

    assert_eq!(grid.len(), 152);
    assert_eq!(grid.first().map(|cell| cell.uptime.day()), Some(date("2026-05-18")));
    let last = grid.last().expect("today");
    assert_eq!(last.uptime.samples(), 1);
    assert_eq!(last.uptime.rtt_mean_label(), "12");
    assert!(grid.iter().rev().skip(1).all(|cell| cell.uptime.samples() == 0));
}
