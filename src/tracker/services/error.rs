//! Service-level errors for tracker orchestration.

use crate::tracker::{domain::ServerGuid, ports::TrackerRepositoryError};
use thiserror::Error;

/// Errors returned by tracker services.
#[derive(Debug, Clone, Error)]
pub enum TrackerServiceError {
    /// No persisted server has the roster GUID.
    #[error("no tracked server with GUID {0}")]
    UnknownServer(ServerGuid),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
}

/// Result type for tracker service operations.
pub type TrackerServiceResult<T> = Result<T, TrackerServiceError>;
