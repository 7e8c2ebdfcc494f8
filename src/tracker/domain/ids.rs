//! Identifier types for tracked servers and status records.

use super::TrackerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable external identifier assigned to a server by the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerGuid(String);

impl ServerGuid {
    /// Creates a validated GUID.
    ///
    /// The input is trimmed. GUIDs are compared case-sensitively, exactly as
    /// the roster publishes them.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyGuid`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyGuid);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the GUID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServerGuid {
    type Error = TrackerDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerGuid> for String {
    fn from(value: ServerGuid) -> Self {
        value.0
    }
}

impl AsRef<str> for ServerGuid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServerGuid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Internal identifier of a persisted server row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(i32);

impl ServerId {
    /// Wraps a persisted row identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the wrapped identifier.
    #[must_use]
    pub const fn into_inner(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Internal identifier of a persisted status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(i64);

impl StatusId {
    /// Wraps a persisted row identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the wrapped identifier.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
