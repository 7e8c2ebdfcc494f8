//! Port contracts for tracker persistence and roster retrieval.

mod repository;
mod roster;

pub use repository::{
    DEFAULT_HISTORY_LIMIT, ServerRepository, StatusRepository, TrackerRepositoryError,
    TrackerRepositoryResult,
};
pub use roster::{RosterFetchError, RosterSource};

#[cfg(test)]
pub use roster::MockRosterSource;
