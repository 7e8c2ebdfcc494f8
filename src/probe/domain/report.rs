//! Outcome of a single probe attempt.

use super::ProbeFailure;
use std::time::Duration;

/// Result of one handshake attempt against a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    rtt: Duration,
    failure: Option<ProbeFailure>,
}

impl ProbeReport {
    /// Creates a report for a server that answered with an accepted reply.
    #[must_use]
    pub const fn up(rtt: Duration) -> Self {
        Self { rtt, failure: None }
    }

    /// Creates a report for a failed attempt.
    #[must_use]
    pub fn failed(rtt: Duration, failure: impl Into<ProbeFailure>) -> Self {
        Self {
            rtt,
            failure: Some(failure.into()),
        }
    }

    /// Returns whether the server answered with an accepted reply.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the wall-clock duration of the attempt.
    #[must_use]
    pub const fn rtt(&self) -> Duration {
        self.rtt
    }

    /// Returns the failure, if the server was not classified as up.
    #[must_use]
    pub const fn failure(&self) -> Option<&ProbeFailure> {
        self.failure.as_ref()
    }
}
