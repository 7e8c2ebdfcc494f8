//! Bulk "check everything now" sweep.

use crate::probe::{
    domain::{LivenessClass, ProbeReport, ProbeTarget},
    ports::Prober,
};
use crate::tracker::domain::{RosterEntry, ServerGuid};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::error;

/// Liveness of one roster entry as seen by a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepResult {
    /// Roster GUID.
    pub guid: ServerGuid,
    /// Display name.
    pub name: String,
    /// Probed address.
    pub target: ProbeTarget,
    /// Three-way classification.
    pub status: LivenessClass,
    /// Probe report, absent when the probe task did not complete.
    #[serde(skip)]
    pub report: Option<ProbeReport>,
}

/// Probes a whole roster concurrently without persisting anything.
#[derive(Clone)]
pub struct RosterSweep<P>
where
    P: Prober + 'static,
{
    prober: Arc<P>,
    timeout: Duration,
}

impl<P> RosterSweep<P>
where
    P: Prober + 'static,
{
    /// Creates a sweep using `timeout` for each probe.
    #[must_use]
    pub const fn new(prober: Arc<P>, timeout: Duration) -> Self {
        Self { prober, timeout }
    }

    /// Probes every entry once, concurrently, and classifies the replies.
    ///
    /// Results are returned in roster order once every probe has finished.
    pub async fn check_all(&self, roster: &[RosterEntry]) -> Vec<SweepResult> {
        let mut tasks = JoinSet::new();
        for (index, entry) in roster.iter().enumerate() {
            let prober = Arc::clone(&self.prober);
            let target = entry.target();
            let timeout = self.timeout;
            tasks.spawn(async move {
                let report = prober.probe(&target, timeout).await;
                (index, report)
            });
        }

        let mut reports: Vec<Option<ProbeReport>> = vec![None; roster.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => {
                    if let Some(slot) = reports.get_mut(index) {
                        *slot = Some(report);
                    }
                }
                Err(err) => error!(error = %err, "sweep probe task failed"),
            }
        }

        roster
            .iter()
            .zip(reports)
            .map(|(entry, report)| SweepResult {
                guid: entry.guid().clone(),
                name: entry.name().to_owned(),
                target: entry.target(),
                status: report
                    .as_ref()
                    .map_or(LivenessClass::Error, LivenessClass::classify),
                report,
            })
            .collect()
    }
}
