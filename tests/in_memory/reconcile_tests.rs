//! Roster reconciliation through the service layer.

use crate::in_memory::helpers::{clock_at, store};
use crate::test_helpers::{at_secs, entry, guid};
use rstest::rstest;
use server_tracker::tracker::{
    adapters::memory::InMemoryTrackerStore, domain::ReconcileSummary, ports::ServerRepository,
    services::RosterReconciler,
};
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciling_unchanged_roster_twice_is_idempotent(store: Arc<InMemoryTrackerStore>) {
    let roster = vec![entry("a", "Alpha", 9000), entry("b", "Beta", 9001)];

    RosterReconciler::new(Arc::clone(&store), clock_at(100))
        .reconcile(&roster)
        .await
        .expect("first reconcile");
    let second = RosterReconciler::new(Arc::clone(&store), clock_at(200))
        .reconcile(&roster)
        .await
        .expect("second reconcile");

    assert_eq!(
        second,
        ReconcileSummary {
            created: 0,
            updated: 2,
            unlisted: 0,
        }
    );
    let servers = store.all_servers().expect("servers");
    assert_eq!(servers.len(), 2);
    assert!(servers.iter().all(|server| server.is_listed()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropping_a_server_soft_deletes_it(store: Arc<InMemoryTrackerStore>) {
    let alpha = entry("a", "Alpha", 9000).with_description("Classic rates");
    RosterReconciler::new(Arc::clone(&store), clock_at(100))
        .reconcile(&[alpha.clone(), entry("b", "Beta", 9001)])
        .await
        .expect("first reconcile");
    let before = store
        .find_by_guid(&guid("a"))
        .await
        .expect("lookup")
        .expect("alpha present");

    RosterReconciler::new(Arc::clone(&store), clock_at(200))
        .reconcile(std::slice::from_ref(&alpha))
        .await
        .expect("second reconcile");

    let servers = store.all_servers().expect("servers");
    assert_eq!(servers.len(), 2);
    let after = store
        .find_by_guid(&guid("a"))
        .await
        .expect("lookup")
        .expect("alpha present");
    assert_eq!(after.id(), before.id());
    assert_eq!(after.entry(), before.entry());
    assert!(after.is_listed());
    assert_eq!(after.created_at(), at_secs(100));

    let beta = store
        .find_by_guid(&guid("b"))
        .await
        .expect("lookup")
        .expect("beta kept");
    assert!(!beta.is_listed());
    assert_eq!(beta.name(), "Beta");
}
