//! Scripted prober for deterministic probing without network access.

use crate::probe::{
    domain::{NetworkError, ProbePhase, ProbeReport, ProbeTarget},
    ports::Prober,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Prober that replays queued reports per target.
///
/// Queued reports are consumed in order. Once a target's queue is empty the
/// fallback report is returned, which defaults to a receive timeout. Every
/// call is counted so tests can assert how many attempts were made.
#[derive(Debug, Clone)]
pub struct ScriptedProber {
    state: Arc<Mutex<ScriptedState>>,
    latency: Duration,
}

#[derive(Debug)]
struct ScriptedState {
    scripts: HashMap<ProbeTarget, VecDeque<ProbeReport>>,
    fallbacks: HashMap<ProbeTarget, ProbeReport>,
    default_fallback: ProbeReport,
    attempts: HashMap<ProbeTarget, u32>,
}

impl Default for ScriptedProber {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProber {
    /// Creates a prober where every target times out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                scripts: HashMap::new(),
                fallbacks: HashMap::new(),
                default_fallback: ProbeReport::failed(
                    Duration::ZERO,
                    NetworkError::Timeout {
                        phase: ProbePhase::Receive,
                    },
                ),
                attempts: HashMap::new(),
            })),
            latency: Duration::ZERO,
        }
    }

    /// Makes every probe take `latency` before it reports.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queues reports to be returned, in order, for `target`.
    pub fn enqueue(&self, target: &ProbeTarget, reports: impl IntoIterator<Item = ProbeReport>) {
        self.lock()
            .scripts
            .entry(target.clone())
            .or_default()
            .extend(reports);
    }

    /// Sets the report returned for `target` once its queue is exhausted.
    pub fn always(&self, target: &ProbeTarget, report: ProbeReport) {
        self.lock().fallbacks.insert(target.clone(), report);
    }

    /// Returns how many probes were made against `target`.
    #[must_use]
    pub fn attempts(&self, target: &ProbeTarget) -> u32 {
        self.lock().attempts.get(target).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_report(&self, target: &ProbeTarget) -> ProbeReport {
        let mut state = self.lock();
        *state.attempts.entry(target.clone()).or_insert(0) += 1;

        if let Some(report) = state
            .scripts
            .get_mut(target)
            .and_then(VecDeque::pop_front)
        {
            return report;
        }

        state
            .fallbacks
            .get(target)
            .unwrap_or(&state.default_fallback)
            .clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: &ProbeTarget, _timeout: Duration) -> ProbeReport {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next_report(target)
    }
}
