//! Status recording service for the tracked pipeline.

use super::{TrackerServiceError, TrackerServiceResult};
use crate::probe::{
    ports::Prober,
    services::{RetryError, RetryPolicy},
};
use crate::tracker::{
    domain::{RosterEntry, ServerGuid, StatusRecord, StatusSample, latest_entries},
    ports::{ServerRepository, StatusRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A server whose status could not be recorded.
#[derive(Debug, Clone)]
pub struct RecordingFailure {
    /// Roster GUID of the server.
    pub guid: ServerGuid,
    /// Why recording failed.
    pub error: TrackerServiceError,
}

/// Outcome of recording statuses for a whole roster.
#[derive(Debug, Clone, Default)]
pub struct RecordingReport {
    /// Records appended, in roster order.
    pub recorded: Vec<StatusRecord>,
    /// Servers skipped because of storage or lookup failures.
    pub failures: Vec<RecordingFailure>,
}

impl RecordingReport {
    /// Returns the number of recorded samples classified up.
    #[must_use]
    pub fn up_count(&self) -> usize {
        self.recorded.iter().filter(|record| record.is_up()).count()
    }

    /// Returns whether every server was recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Probes reconciled servers and appends their status samples.
///
/// Probe failures never escape: an unreachable server is recorded as down.
/// Only lookup and storage failures are returned.
#[derive(Clone)]
pub struct StatusRecorder<R, P, C>
where
    R: ServerRepository + StatusRepository,
    P: Prober,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    prober: Arc<P>,
    policy: RetryPolicy,
    clock: Arc<C>,
}

impl<R, P, C> StatusRecorder<R, P, C>
where
    R: ServerRepository + StatusRepository,
    P: Prober,
    C: Clock + Send + Sync,
{
    /// Creates a recorder probing through `policy`.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        prober: Arc<P>,
        policy: RetryPolicy,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            prober,
            policy,
            clock,
        }
    }

    /// Returns the retry policy used for every probe.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Probes one roster entry and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::UnknownServer`] when the entry has not
    /// been reconciled, or [`TrackerServiceError::Repository`] when the
    /// sample cannot be stored.
    pub async fn record_one(&self, entry: &RosterEntry) -> TrackerServiceResult<StatusRecord> {
        let server = self
            .repository
            .find_by_guid(entry.guid())
            .await?
            .ok_or_else(|| TrackerServiceError::UnknownServer(entry.guid().clone()))?;

        let target = entry.target();
        let outcome = self.policy.check_with_retry(&*self.prober, &target).await;
        let observed_at = self.clock.utc();

        let sample = match outcome.error() {
            None => {
                let rtt = outcome.last_report().rtt();
                info!(
                    server = entry.name(),
                    %target,
                    rtt_ms = rtt.as_millis(),
                    attempts = outcome.attempts_used(),
                    "server answered"
                );
                StatusSample::up(server.id(), observed_at, rtt)
            }
            Some(retry_error) => {
                let message = failure_message(retry_error);
                warn!(server = entry.name(), %target, %message, "server did not answer");
                StatusSample::down(server.id(), observed_at, message)
            }
        };

        Ok(self.repository.record(sample).await?)
    }

    /// Records every server in `roster`, one after another.
    ///
    /// A failure for one server is logged and collected; the remaining
    /// servers are still recorded.
    pub async fn record_all(&self, roster: &[RosterEntry]) -> RecordingReport {
        let mut report = RecordingReport::default();
        for entry in latest_entries(roster) {
            match self.record_one(entry).await {
                Ok(record) => report.recorded.push(record),
                Err(err) => {
                    error!(
                        guid = %entry.guid(),
                        server = entry.name(),
                        error = %err,
                        "failed to record status"
                    );
                    report.failures.push(RecordingFailure {
                        guid: entry.guid().clone(),
                        error: err,
                    });
                }
            }
        }
        report
    }
}

fn failure_message(retry_error: &RetryError) -> String {
    format!("{retry_error}: {}", retry_error.last_failure())
}
