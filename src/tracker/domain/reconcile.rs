//! Outcome of merging a roster into the persisted server set.

use super::{RosterEntry, ServerGuid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counts of rows touched by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Servers seen for the first time.
    pub created: usize,
    /// Existing servers refreshed from the roster.
    pub updated: usize,
    /// Servers left unlisted after the merge.
    pub unlisted: usize,
}

/// Collapses duplicate GUIDs in `roster`, keeping the content of the last
/// occurrence at the position of the first.
#[must_use]
pub fn latest_entries(roster: &[RosterEntry]) -> Vec<&RosterEntry> {
    let mut positions: HashMap<&ServerGuid, usize> = HashMap::new();
    let mut entries: Vec<&RosterEntry> = Vec::with_capacity(roster.len());
    for entry in roster {
        if let Some(slot) = positions
            .get(entry.guid())
            .and_then(|position| entries.get_mut(*position))
        {
            *slot = entry;
        } else {
            positions.insert(entry.guid(), entries.len());
            entries.push(entry);
        }
    }
    entries
}
