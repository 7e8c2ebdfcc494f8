//! Failure taxonomy for probe attempts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Stage of a probe attempt at which a network failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePhase {
    /// Host name resolution.
    Resolve,
    /// Binding the local ephemeral socket.
    Bind,
    /// Associating the socket with the remote address.
    Connect,
    /// Sending the handshake datagram.
    Send,
    /// Waiting for the reply datagram.
    Receive,
}

impl ProbePhase {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Bind => "bind",
            Self::Connect => "connect",
            Self::Send => "send",
            Self::Receive => "receive",
        }
    }
}

impl fmt::Display for ProbePhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Transport-level probe failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The phase did not complete within the probe timeout.
    #[error("{phase} timed out")]
    Timeout {
        /// Phase that exceeded the deadline.
        phase: ProbePhase,
    },

    /// The remote host rejected the datagram (ICMP port unreachable).
    #[error("{phase}: connection refused")]
    ConnectionRefused {
        /// Phase that observed the refusal.
        phase: ProbePhase,
    },

    /// Host name resolution produced no usable address.
    #[error("no address found for {host}")]
    NoAddress {
        /// Host that failed to resolve.
        host: String,
    },

    /// Any other I/O failure.
    #[error("{phase} failed: {message}")]
    Io {
        /// Phase that failed.
        phase: ProbePhase,
        /// Kind reported by the operating system.
        kind: io::ErrorKind,
        /// Operating system error text.
        message: String,
    },
}

impl NetworkError {
    /// Classifies an I/O error raised during `phase`.
    #[must_use]
    pub fn from_io(phase: ProbePhase, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused { phase },
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout { phase },
            kind => Self::Io {
                phase,
                kind,
                message: err.to_string(),
            },
        }
    }

    /// Returns whether this failure is a known transient signature.
    ///
    /// Timeouts and refusals are what a server that is simply offline
    /// produces; anything else points at a local or addressing problem.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionRefused { .. }
        )
    }
}

/// Reason a probe attempt did not classify the server as up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// Dial, write or read failed, including timeouts.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A reply arrived but its length is not an accepted handshake reply.
    #[error("unexpected reply length of {received} bytes")]
    ProtocolMismatch {
        /// Number of bytes received.
        received: usize,
    },
}

/// Error returned while parsing a `host:port` probe target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseProbeTargetError {
    /// The input has no `:port` suffix.
    #[error("probe target '{0}' is missing a port")]
    MissingPort(String),

    /// The host part is empty.
    #[error("probe target '{0}' has an empty host")]
    EmptyHost(String),

    /// The port is not a number in `0..=65535`.
    #[error("invalid probe port '{0}'")]
    InvalidPort(String),
}
