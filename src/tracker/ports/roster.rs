//! Port for retrieving the current server roster.

use crate::tracker::domain::RosterEntry;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Source of the externally published server roster.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Fetches the full current roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterFetchError`] when the roster cannot be retrieved or
    /// parsed.
    async fn fetch(&self) -> Result<Vec<RosterEntry>, RosterFetchError>;
}

/// Errors returned while fetching the roster.
#[derive(Debug, Clone, Error)]
pub enum RosterFetchError {
    /// The roster document could not be read.
    #[error("failed to read roster from {}: {source}", path.display())]
    Read {
        /// Location of the roster document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The roster document is malformed.
    #[error("failed to parse roster: {0}")]
    Parse(Arc<dyn std::error::Error + Send + Sync>),

    /// The roster source is temporarily unavailable.
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

impl RosterFetchError {
    /// Wraps a roster parsing failure.
    pub fn parse(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Parse(Arc::new(err))
    }
}
