//! Tests for the concurrent roster sweep.

use std::sync::Arc;
use std::time::Duration;

use super::support::entry;
use crate::probe::{
    adapters::ScriptedProber,
    domain::{LivenessClass, NetworkError, ProbeFailure, ProbePhase, ProbeReport},
};
use crate::tracker::services::RosterSweep;
use rstest::rstest;
use tokio::time::Instant;

#[rstest]
#[tokio::test]
async fn classifies_each_entry_in_roster_order() {
    let roster = vec![
        entry("up", "Up", 9000),
        entry("odd", "Odd reply", 9001),
        entry("silent", "Silent", 9002),
        entry("broken", "Broken", 9003),
    ];
    let prober = ScriptedProber::new();
    let [up, odd, _silent, broken] = roster.as_slice() else {
        panic!("four roster entries");
    };
    prober.always(&up.target(), ProbeReport::up(Duration::from_millis(12)));
    prober.always(
        &odd.target(),
        ProbeReport::failed(
            Duration::from_millis(3),
            ProbeFailure::ProtocolMismatch { received: 7 },
        ),
    );
    prober.always(
        &broken.target(),
        ProbeReport::failed(
            Duration::ZERO,
            NetworkError::NoAddress {
                host: "127.0.0.1".to_owned(),
            },
        ),
    );
    let sweep = RosterSweep::new(Arc::new(prober), Duration::from_secs(1));

    let results = sweep.check_all(&roster).await;

    let summary: Vec<(&str, LivenessClass)> = results
        .iter()
        .map(|result| (result.guid.as_str(), result.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("up", LivenessClass::Up),
            ("odd", LivenessClass::Down),
            ("silent", LivenessClass::Down),
            ("broken", LivenessClass::Error),
        ]
    );
    assert!(results.iter().all(|result| result.report.is_some()));
}

#[rstest]
#[tokio::test]
async fn sweep_probes_each_entry_once() {
    let roster = vec![entry("a", "Alpha", 9000), entry("b", "Beta", 9001)];
    let prober = Arc::new(ScriptedProber::new());
    let sweep = RosterSweep::new(Arc::clone(&prober), Duration::from_secs(1));

    let results = sweep.check_all(&roster).await;

    assert_eq!(results.len(), 2);
    for roster_entry in &roster {
        assert_eq!(prober.attempts(&roster_entry.target()), 1);
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn probes_run_concurrently() {
    let roster: Vec<_> = (0..8_u16)
        .map(|index| entry(&format!("s{index}"), "Server", 9000 + index))
        .collect();
    let prober = ScriptedProber::new().with_latency(Duration::from_secs(1));
    let sweep = RosterSweep::new(Arc::new(prober), Duration::from_secs(5));

    let started = Instant::now();
    let results = sweep.check_all(&roster).await;

    assert_eq!(results.len(), 8);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[rstest]
#[tokio::test]
async fn empty_roster_yields_no_results() {
    let sweep = RosterSweep::new(Arc::new(ScriptedProber::new()), Duration::from_secs(1));

    assert!(sweep.check_all(&[]).await.is_empty());
}
