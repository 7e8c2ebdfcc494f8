//! Connection pooling and schema setup for the `SQLite` store.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::info;

/// `SQLite` connection pool type for tracker adapters.
pub type TrackerSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database URL of a private in-memory database.
pub(super) const IN_MEMORY_URL: &str = ":memory:";

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Errors returned while opening or migrating the database.
#[derive(Debug, Error)]
pub enum SqliteSetupError {
    /// The connection pool could not be built.
    #[error("failed to open database pool: {0}")]
    Pool(#[from] PoolError),

    /// Pending migrations could not be applied.
    #[error("failed to run migrations: {0}")]
    Migration(String),
}

#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(CONNECTION_PRAGMAS)
            .map_err(diesel::r2d2::Error::QueryError)?;
        if self.wal {
            connection
                .batch_execute("PRAGMA journal_mode = WAL;")
                .map_err(diesel::r2d2::Error::QueryError)?;
        }
        Ok(())
    }
}

/// Opens a connection pool for `database_url` and applies pending
/// migrations.
///
/// An in-memory database exists per connection, so `:memory:` URLs are
/// always served by a single pooled connection that is never recycled.
///
/// # Errors
///
/// Returns [`SqliteSetupError`] when the pool cannot be built or migrations
/// fail.
pub fn build_pool(
    database_url: &str,
    max_size: u32,
) -> Result<TrackerSqlitePool, SqliteSetupError> {
    let in_memory = database_url == IN_MEMORY_URL;
    let mut builder = Pool::builder()
        .max_size(if in_memory { 1 } else { max_size.max(1) })
        .connection_customizer(Box::new(ConnectionPragmas { wal: !in_memory }));
    if in_memory {
        // Recycling the only connection would discard the database.
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(ConnectionManager::<SqliteConnection>::new(database_url))?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// Applies pending embedded migrations.
///
/// # Errors
///
/// Returns [`SqliteSetupError`] when no connection is available or a
/// migration fails.
pub fn run_migrations(pool: &TrackerSqlitePool) -> Result<(), SqliteSetupError> {
    let mut connection = pool.get()?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| SqliteSetupError::Migration(err.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied database migrations");
    }
    Ok(())
}
