//! One full update cycle: fetch, reconcile, record.

use super::{RecordingReport, RosterReconciler, StatusRecorder, TrackerServiceError};
use crate::probe::{ports::Prober, services::RetryPolicy};
use crate::tracker::{
    domain::ReconcileSummary,
    ports::{RosterFetchError, RosterSource, ServerRepository, StatusRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Errors that abort an update cycle.
#[derive(Debug, Clone, Error)]
pub enum CycleError {
    /// The roster could not be fetched; nothing was reconciled or recorded.
    #[error("failed to fetch roster")]
    RosterFetch(#[source] RosterFetchError),
    /// The roster could not be reconciled; no status was recorded.
    #[error("failed to reconcile roster")]
    Reconcile(#[source] TrackerServiceError),
}

/// Outcome of a completed update cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Reconciliation counts.
    pub summary: ReconcileSummary,
    /// Per-server recording outcome.
    pub recording: RecordingReport,
}

/// Runs update cycles, never more than one at a time per instance.
pub struct UpdateCycle<R, P, S, C>
where
    R: ServerRepository + StatusRepository,
    P: Prober,
    S: RosterSource,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    reconciler: RosterReconciler<R, C>,
    recorder: StatusRecorder<R, P, C>,
    lock: Mutex<()>,
}

impl<R, P, S, C> UpdateCycle<R, P, S, C>
where
    R: ServerRepository + StatusRepository,
    P: Prober,
    S: RosterSource,
    C: Clock + Send + Sync,
{
    /// Creates an update cycle over the given collaborators.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        prober: Arc<P>,
        source: Arc<S>,
        policy: RetryPolicy,
        clock: Arc<C>,
    ) -> Self {
        Self {
            source,
            reconciler: RosterReconciler::new(Arc::clone(&repository), Arc::clone(&clock)),
            recorder: StatusRecorder::new(repository, prober, policy, clock),
            lock: Mutex::new(()),
        }
    }

    /// Fetches the roster, reconciles it and records a status for every
    /// entry.
    ///
    /// Concurrent calls on the same instance wait for each other.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::RosterFetch`] when the roster is unavailable
    /// and [`CycleError::Reconcile`] when it cannot be merged. Per-server
    /// recording failures are reported in [`CycleReport::recording`].
    pub async fn run(&self) -> Result<CycleReport, CycleError> {
        let _running = self.lock.lock().await;
        info!("beginning update cycle");

        let roster = self.source.fetch().await.map_err(|err| {
            error!(error = %err, "failed to fetch roster");
            CycleError::RosterFetch(err)
        })?;

        let summary = self.reconciler.reconcile(&roster).await.map_err(|err| {
            error!(error = %err, "failed to reconcile roster");
            CycleError::Reconcile(err)
        })?;

        let recording = self.recorder.record_all(&roster).await;
        info!(
            recorded = recording.recorded.len(),
            up = recording.up_count(),
            failed = recording.failures.len(),
            "update cycle finished"
        );
        Ok(CycleReport { summary, recording })
    }
}
