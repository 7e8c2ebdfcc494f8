//! Error types for tracker domain validation.

use thiserror::Error;

/// Errors returned while constructing tracker domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// The server GUID is empty after trimming.
    #[error("server GUID must not be empty")]
    EmptyGuid,

    /// A persisted port does not fit in a UDP port number.
    #[error("server port {0} is outside the valid UDP port range")]
    InvalidPort(i64),

    /// A persisted timestamp cannot be represented.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),

    /// A persisted round-trip time is negative.
    #[error("round-trip time {0} ms must not be negative")]
    NegativeRtt(i64),
}
