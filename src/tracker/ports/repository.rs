//! Repository ports for tracked servers and status history.

use crate::tracker::domain::{
    DailySamples, ReconcileSummary, RosterEntry, ServerGuid, ServerId, StatusRecord,
    StatusSample, TrackedServer,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Number of history rows returned by default by [`StatusRepository::recent`].
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Persistence contract for tracked servers.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Merges `roster` into the persisted server set as one unit of work.
    ///
    /// Every server is first marked unlisted. Each entry then updates the
    /// server with the same GUID (overwriting descriptive fields, relisting
    /// it and setting `updated_at = now`) or inserts a new listed server.
    /// When a GUID appears more than once, the later entry wins. Nothing is
    /// applied if any step fails.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the merge cannot
    /// be committed.
    async fn reconcile(
        &self,
        roster: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<ReconcileSummary>;

    /// Finds a server by roster GUID.
    async fn find_by_guid(
        &self,
        guid: &ServerGuid,
    ) -> TrackerRepositoryResult<Option<TrackedServer>>;

    /// Finds a server by row identifier.
    async fn find_by_id(
        &self,
        server_id: ServerId,
    ) -> TrackerRepositoryResult<Option<TrackedServer>>;

    /// Returns listed servers ordered by case-insensitive name.
    async fn list_listed(&self) -> TrackerRepositoryResult<Vec<TrackedServer>>;

    /// Returns the most recent `updated_at` across all servers.
    async fn last_updated_at(&self) -> TrackerRepositoryResult<Option<DateTime<Utc>>>;
}

/// Persistence contract for status history.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Appends `sample` and updates the server's derived fields in one unit
    /// of work.
    ///
    /// The server's `is_online` becomes the sample's outcome. When the sample
    /// is up, `last_seen` advances to the sample timestamp unless it already
    /// holds a later one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::UnknownServer`] when the server row
    /// does not exist, or [`TrackerRepositoryError::Persistence`] when the
    /// write fails.
    async fn record(&self, sample: StatusSample) -> TrackerRepositoryResult<StatusRecord>;

    /// Returns up to `limit` records for a server, newest first.
    async fn recent(
        &self,
        server_id: ServerId,
        limit: usize,
    ) -> TrackerRepositoryResult<Vec<StatusRecord>>;

    /// Returns per-day sample counts for the UTC days in
    /// `first_day..=last_day`.
    ///
    /// Days without samples may be omitted; callers fill the gaps.
    async fn daily_samples(
        &self,
        server_id: ServerId,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailySamples>>;
}

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// The referenced server row does not exist.
    #[error("tracked server not found: {0}")]
    UnknownServer(ServerId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted tracker data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
