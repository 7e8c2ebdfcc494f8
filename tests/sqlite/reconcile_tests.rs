//! Roster reconciliation against `SQLite`.

use crate::sqlite::helpers::store;
use crate::test_helpers::{at_secs, entry, guid};
use rstest::rstest;
use server_tracker::tracker::{
    adapters::sqlite::SqliteTrackerStore, domain::ReconcileSummary, ports::ServerRepository,
};
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciling_twice_keeps_two_listed_rows(store: Arc<SqliteTrackerStore>) {
    let roster = vec![entry("a", "Alpha", 9000), entry("b", "Beta", 9001)];

    let first = store.reconcile(&roster, at_secs(100)).await.expect("reconcile");
    let second = store.reconcile(&roster, at_secs(200)).await.expect("reconcile");

    assert_eq!(first.created, 2);
    assert_eq!(
        second,
        ReconcileSummary {
            created: 0,
            updated: 2,
            unlisted: 0,
        }
    );
    let listed = store.list_listed().await.expect("listed");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|server| server.created_at() == at_secs(100)));
    assert_eq!(store.last_updated_at().await.expect("query"), Some(at_secs(200)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropped_server_is_unlisted_and_kept(store: Arc<SqliteTrackerStore>) {
    let alpha = entry("a", "Alpha", 9000)
        .with_description("Classic rates")
        .with_emulator("rAthena")
        .with_connection_type("udp")
        .with_status("open")
        .with_website_url("https://alpha.example")
        .with_discord_url("");
    store
        .reconcile(&[alpha.clone(), entry("b", "Beta", 9001)], at_secs(100))
        .await
        .expect("reconcile");

    let summary = store
        .reconcile(std::slice::from_ref(&alpha), at_secs(200))
        .await
        .expect("reconcile");

    assert_eq!(summary.unlisted, 1);
    let kept = store
        .find_by_guid(&guid("a"))
        .await
        .expect("lookup")
        .expect("alpha present");
    assert_eq!(kept.entry(), &alpha);
    assert!(kept.is_listed());
    let beta = store
        .find_by_guid(&guid("b"))
        .await
        .expect("lookup")
        .expect("beta kept");
    assert!(!beta.is_listed());
    assert_eq!(beta.updated_at(), at_secs(100));
    assert_eq!(
        store.find_by_id(beta.id()).await.expect("lookup"),
        Some(beta.clone())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_guids_keep_the_later_entry(store: Arc<SqliteTrackerStore>) {
    let summary = store
        .reconcile(
            &[entry("a", "First", 9000), entry("a", "Second", 9001)],
            at_secs(100),
        )
        .await
        .expect("reconcile");

    assert_eq!(summary.created, 1);
    let server = store
        .find_by_guid(&guid("a"))
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(server.name(), "Second");
    assert_eq!(server.entry().port(), 9001);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listed_servers_sort_by_case_insensitive_name(store: Arc<SqliteTrackerStore>) {
    store
        .reconcile(
            &[
                entry("c", "charlie", 9002),
                entry("a", "Bravo", 9000),
                entry("b", "alpha", 9001),
            ],
            at_secs(100),
        )
        .await
        .expect("reconcile");

    let names: Vec<String> = store
        .list_listed()
        .await
        .expect("listed")
        .iter()
        .map(|server| server.name().to_owned())
        .collect();

    assert_eq!(names, vec!["alpha", "Bravo", "charlie"]);
}
