//! Append-only status samples.

use super::{ServerId, StatusId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one probe cycle for one server, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSample {
    server_id: ServerId,
    observed_at: DateTime<Utc>,
    up: bool,
    rtt: Option<Duration>,
    message: Option<String>,
}

impl StatusSample {
    /// Creates a sample for a server that answered.
    #[must_use]
    pub const fn up(server_id: ServerId, observed_at: DateTime<Utc>, rtt: Duration) -> Self {
        Self {
            server_id,
            observed_at,
            up: true,
            rtt: Some(rtt),
            message: None,
        }
    }

    /// Creates a sample for a server that did not answer.
    #[must_use]
    pub fn down(
        server_id: ServerId,
        observed_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            server_id,
            observed_at,
            up: false,
            rtt: None,
            message: Some(message.into()),
        }
    }

    /// Reconstructs a sample from stored columns.
    #[must_use]
    pub const fn from_parts(
        server_id: ServerId,
        observed_at: DateTime<Utc>,
        up: bool,
        rtt: Option<Duration>,
        message: Option<String>,
    ) -> Self {
        Self {
            server_id,
            observed_at,
            up,
            rtt,
            message,
        }
    }

    /// Returns the sampled server.
    #[must_use]
    pub const fn server_id(&self) -> ServerId {
        self.server_id
    }

    /// Returns when the probe completed.
    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Returns whether the server answered.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.up
    }

    /// Returns the round-trip time of the successful attempt.
    #[must_use]
    pub const fn rtt(&self) -> Option<Duration> {
        self.rtt
    }

    /// Returns the round-trip time in whole milliseconds.
    #[must_use]
    pub fn rtt_millis(&self) -> Option<i64> {
        self.rtt
            .map(|rtt| i64::try_from(rtt.as_millis()).unwrap_or(i64::MAX))
    }

    /// Returns the failure description, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// A persisted status sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    id: StatusId,
    sample: StatusSample,
}

impl StatusRecord {
    /// Pairs a stored sample with its row identifier.
    #[must_use]
    pub const fn new(id: StatusId, sample: StatusSample) -> Self {
        Self { id, sample }
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the stored sample.
    #[must_use]
    pub const fn sample(&self) -> &StatusSample {
        &self.sample
    }

    /// Returns the sampled server.
    #[must_use]
    pub const fn server_id(&self) -> ServerId {
        self.sample.server_id
    }

    /// Returns the record timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.sample.observed_at
    }

    /// Returns whether the server answered.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.sample.up
    }

    /// Returns the recorded round-trip time.
    #[must_use]
    pub const fn rtt(&self) -> Option<Duration> {
        self.sample.rtt
    }

    /// Returns the failure description, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.sample.message()
    }
}
