//! `SQLite` adapters for tracker persistence.

mod models;
mod pool;
mod repository;
mod schema;

pub use pool::{SqliteSetupError, TrackerSqlitePool, build_pool, run_migrations};
pub use repository::SqliteTrackerStore;
