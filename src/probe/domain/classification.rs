//! Three-way liveness classification for interactive status views.

use super::{ProbeFailure, ProbeReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Liveness class shown by the bulk "check everything now" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LivenessClass {
    /// The server answered the handshake.
    Up,
    /// The server did not answer, or answered with an unknown reply.
    Down,
    /// The probe could not be carried out.
    Error,
}

impl LivenessClass {
    /// Classifies a probe report.
    ///
    /// Timeouts and refusals count as `Down`, matching what the tracked
    /// pipeline records for the same probe.
    #[must_use]
    pub const fn classify(report: &ProbeReport) -> Self {
        match report.failure() {
            None => Self::Up,
            Some(ProbeFailure::ProtocolMismatch { .. }) => Self::Down,
            Some(ProbeFailure::Network(network)) if network.is_transient() => Self::Down,
            Some(ProbeFailure::Network(_)) => Self::Error,
        }
    }

    /// Returns the canonical uppercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LivenessClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
