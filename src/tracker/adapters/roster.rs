//! Roster sources backed by memory or a local JSON document.

use crate::tracker::{
    domain::RosterEntry,
    ports::{RosterFetchError, RosterSource},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Roster source that returns a fixed, replaceable list.
#[derive(Debug, Clone, Default)]
pub struct StaticRosterSource {
    entries: Arc<RwLock<Vec<RosterEntry>>>,
}

impl StaticRosterSource {
    /// Creates a source serving `entries`.
    #[must_use]
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Replaces the served roster.
    pub fn replace(&self, entries: Vec<RosterEntry>) {
        *self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entries;
    }
}

#[async_trait]
impl RosterSource for StaticRosterSource {
    async fn fetch(&self) -> Result<Vec<RosterEntry>, RosterFetchError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Roster source reading a JSON array of roster entries from disk.
///
/// The file is re-read on every fetch, so edits take effect on the next
/// cycle.
#[derive(Debug, Clone)]
pub struct JsonFileRosterSource {
    path: PathBuf,
}

impl JsonFileRosterSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the roster document location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RosterSource for JsonFileRosterSource {
    async fn fetch(&self) -> Result<Vec<RosterEntry>, RosterFetchError> {
        let document = tokio::fs::read(&self.path)
            .await
            .map_err(|err| RosterFetchError::Read {
                path: self.path.clone(),
                source: Arc::new(err),
            })?;
        let entries: Vec<RosterEntry> =
            serde_json::from_slice(&document).map_err(RosterFetchError::parse)?;
        debug!(path = %self.path.display(), count = entries.len(), "loaded roster");
        Ok(entries)
    }
}
