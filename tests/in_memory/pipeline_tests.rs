//! Update cycles and sweeps against loopback UDP servers.

use crate::in_memory::helpers::{clock_at, silent_port, spawn_responder, store};
use crate::test_helpers::{at_secs, entry, guid};
use rstest::rstest;
use server_tracker::probe::{adapters::UdpProber, domain::LivenessClass, services::RetryPolicy};
use server_tracker::tracker::{
    adapters::{StaticRosterSource, memory::InMemoryTrackerStore},
    ports::{ServerRepository, StatusRepository},
    services::{RosterSweep, UpdateCycle},
};
use std::sync::Arc;
use std::time::Duration;

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(20), Duration::from_millis(250))
        .expect("valid retry policy")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cycle_records_accepted_reply_lengths_as_up(store: Arc<InMemoryTrackerStore>) {
    let mut responders = Vec::new();
    let mut roster = Vec::new();
    for (index, length) in [28_usize, 44, 52, 30].into_iter().enumerate() {
        let (target, handle) = spawn_responder(length).await;
        roster.push(entry(&format!("s{index}"), &format!("Reply {length}"), target.port()));
        responders.push(handle);
    }
    roster.push(entry("quiet", "Quiet", silent_port()));

    let cycle = UpdateCycle::new(
        Arc::clone(&store),
        Arc::new(UdpProber::new()),
        Arc::new(StaticRosterSource::new(roster)),
        fast_policy(),
        clock_at(1_000),
    );
    let report = cycle.run().await.expect("cycle");

    assert!(report.recording.is_complete());
    assert_eq!(report.recording.recorded.len(), 5);
    let outcomes: Vec<bool> = report
        .recording
        .recorded
        .iter()
        .map(|record| record.is_up())
        .collect();
    assert_eq!(outcomes, vec![true, true, true, false, false]);

    let mismatch = store
        .find_by_guid(&guid("s3"))
        .await
        .expect("lookup")
        .expect("present");
    let history = store.recent(mismatch.id(), 10).await.expect("history");
    let message = history
        .first()
        .and_then(|record| record.message())
        .expect("down message");
    assert!(message.contains("unexpected reply length of 30 bytes"));

    for handle in responders {
        handle.abort();
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_probe_never_moves_last_seen_back(store: Arc<InMemoryTrackerStore>) {
    let (target, responder) = spawn_responder(44).await;
    let source = Arc::new(StaticRosterSource::new(vec![entry(
        "a",
        "Alpha",
        target.port(),
    )]));

    UpdateCycle::new(
        Arc::clone(&store),
        Arc::new(UdpProber::new()),
        Arc::clone(&source),
        fast_policy(),
        clock_at(1_000),
    )
    .run()
    .await
    .expect("first cycle");
    responder.abort();
    let _stopped = responder.await;

    UpdateCycle::new(
        Arc::clone(&store),
        Arc::new(UdpProber::new()),
        source,
        fast_policy(),
        clock_at(2_000),
    )
    .run()
    .await
    .expect("second cycle");

    let server = store
        .find_by_guid(&guid("a"))
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(server.is_online(), Some(false));
    assert_eq!(server.last_seen(), Some(at_secs(1_000)));
    assert_eq!(store.all_statuses().expect("statuses").len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_probes_every_entry_once() {
    let (up_target, up_responder) = spawn_responder(52).await;
    let (odd_target, odd_responder) = spawn_responder(12).await;
    let roster = vec![
        entry("up", "Answers", up_target.port()),
        entry("down", "Silent", silent_port()),
        entry("odd", "Odd reply", odd_target.port()),
    ];

    let results = RosterSweep::new(Arc::new(UdpProber::new()), Duration::from_millis(250))
        .check_all(&roster)
        .await;

    let classes: Vec<LivenessClass> = results.iter().map(|result| result.status).collect();
    assert_eq!(
        classes,
        vec![LivenessClass::Up, LivenessClass::Down, LivenessClass::Down]
    );
    assert!(results.iter().all(|result| result.report.is_some()));
    up_responder.abort();
    odd_responder.abort();
}
