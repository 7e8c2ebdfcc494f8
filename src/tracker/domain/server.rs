//! Tracked server aggregate root.

use super::{RosterEntry, ServerGuid, ServerId};
use crate::probe::domain::ProbeTarget;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server known to the tracker, listed or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedServer {
    id: ServerId,
    entry: RosterEntry,
    is_listed: bool,
    is_online: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing persisted server state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedServerData {
    /// Persisted row identifier.
    pub id: ServerId,
    /// Descriptive fields as last seen in the roster.
    pub entry: RosterEntry,
    /// Whether the server was present in the latest roster.
    pub is_listed: bool,
    /// Result of the latest probe, absent before the first one.
    pub is_online: Option<bool>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Timestamp of the latest successful probe.
    pub last_seen: Option<DateTime<Utc>>,
}

impl TrackedServer {
    /// Creates a listed server from its first roster sighting.
    #[must_use]
    pub fn from_roster(id: ServerId, entry: RosterEntry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            entry,
            is_listed: true,
            is_online: None,
            created_at: now,
            updated_at: now,
            last_seen: None,
        }
    }

    /// Reconstructs a server from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedServerData) -> Self {
        Self {
            id: data.id,
            entry: data.entry,
            is_listed: data.is_listed,
            is_online: data.is_online,
            created_at: data.created_at,
            updated_at: data.updated_at,
            last_seen: data.last_seen,
        }
    }

    /// Returns the persisted row identifier.
    #[must_use]
    pub const fn id(&self) -> ServerId {
        self.id
    }

    /// Returns the stable roster GUID.
    #[must_use]
    pub const fn guid(&self) -> &ServerGuid {
        self.entry.guid()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.entry.name()
    }

    /// Returns the descriptive fields last taken from the roster.
    #[must_use]
    pub const fn entry(&self) -> &RosterEntry {
        &self.entry
    }

    /// Returns whether the server appeared in the latest roster.
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        self.is_listed
    }

    /// Returns the latest probe result, if the server was ever probed.
    #[must_use]
    pub const fn is_online(&self) -> Option<bool> {
        self.is_online
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the timestamp of the latest successful probe.
    #[must_use]
    pub const fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// Returns the address to probe.
    #[must_use]
    pub fn target(&self) -> ProbeTarget {
        self.entry.target()
    }

    /// Overwrites descriptive fields from a fresh roster sighting and marks
    /// the server listed.
    ///
    /// The GUID of `entry` is expected to match; identity never changes.
    pub fn apply_roster_entry(&mut self, entry: RosterEntry, now: DateTime<Utc>) {
        self.entry = entry;
        self.is_listed = true;
        self.updated_at = now;
    }

    /// Marks the server as absent from the current roster.
    pub const fn mark_unlisted(&mut self) {
        self.is_listed = false;
    }

    /// Applies the outcome of a probe observed at `observed_at`.
    ///
    /// `last_seen` only moves forward.
    pub fn record_probe(&mut self, up: bool, observed_at: DateTime<Utc>) {
        self.is_online = Some(up);
        if up && self.last_seen.is_none_or(|seen| observed_at > seen) {
            self.last_seen = Some(observed_at);
        }
    }
}
