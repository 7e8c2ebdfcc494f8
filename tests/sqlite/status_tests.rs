//! Status recording and history against `SQLite`.

use crate::sqlite::helpers::{seed_one, store};
use crate::test_helpers::at_secs;
use eyre::{OptionExt, ensure};
use rstest::rstest;
use server_tracker::tracker::{
    adapters::sqlite::SqliteTrackerStore,
    domain::{ServerId, StatusSample},
    ports::{DEFAULT_HISTORY_LIMIT, ServerRepository, StatusRepository, TrackerRepositoryError},
};
use std::sync::Arc;
use std::time::Duration;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recording_unknown_server_fails_without_writing(store: Arc<SqliteTrackerStore>) {
    let result = store
        .record(StatusSample::down(ServerId::new(99), at_secs(10), "timed out"))
        .await;

    assert!(matches!(
        result,
        Err(TrackerRepositoryError::UnknownServer(id)) if id == ServerId::new(99)
    ));
    assert!(
        store
            .recent(ServerId::new(99), DEFAULT_HISTORY_LIMIT)
            .await
            .expect("history")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recorded_samples_round_trip(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;

    let up = store
        .record(StatusSample::up(id, at_secs(100), Duration::from_millis(37)))
        .await
        .expect("record up");
    let down = store
        .record(StatusSample::down(id, at_secs(200), "receive timed out"))
        .await
        .expect("record down");

    let history = store.recent(id, DEFAULT_HISTORY_LIMIT).await.expect("history");
    assert_eq!(history, vec![down.clone(), up.clone()]);
    assert!(down.id() > up.id());
    assert_eq!(up.rtt(), Some(Duration::from_millis(37)));
    assert_eq!(down.message(), Some("receive timed out"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_seen_only_moves_forward(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;

    store
        .record(StatusSample::up(id, at_secs(500), Duration::from_millis(10)))
        .await
        .expect("record");
    let after_up = store.find_by_id(id).await.expect("lookup").expect("present");
    store
        .record(StatusSample::down(id, at_secs(600), "timed out"))
        .await
        .expect("record");
    store
        .record(StatusSample::up(id, at_secs(400), Duration::from_millis(10)))
        .await
        .expect("record");
    let after_all = store.find_by_id(id).await.expect("lookup").expect("present");

    assert_eq!(after_up.last_seen(), Some(at_secs(500)));
    assert_eq!(after_up.is_online(), Some(true));
    assert_eq!(after_all.last_seen(), Some(at_secs(500)));
    assert_eq!(after_all.is_online(), Some(true));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn down_sample_leaves_last_seen_unset(store: Arc<SqliteTrackerStore>) -> eyre::Result<()> {
    let id = seed_one(&store).await;

    store
        .record(StatusSample::down(id, at_secs(600), "timed out"))
        .await?;

    let server = store
        .find_by_id(id)
        .await?
        .ok_or_eyre("seeded server should exist")?;
    ensure!(server.last_seen().is_none());
    ensure!(server.is_online() == Some(false));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recent_is_newest_first_and_limited(store: Arc<SqliteTrackerStore>) {
    let id = seed_one(&store).await;
    for seconds in [30, 10, 20] {
        store
            .record(StatusSample::down(id, at_secs(seconds), "timed out"))
            .await
            .expect("record");
    }

    let limited = store.recent(id, 2).await.expect("history");

    let times: Vec<_> = limited.iter().map(|record| record.created_at()).collect();
    assert_eq!(times, vec![at_secs(30), at_secs(20)]);
}
