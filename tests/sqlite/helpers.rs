//! Shared fixtures for `SQLite` integration tests.

use crate::test_helpers::{at_secs, entry};
use rstest::fixture;
use server_tracker::tracker::adapters::sqlite::SqliteTrackerStore;
use server_tracker::tracker::domain::ServerId;
use server_tracker::tracker::ports::ServerRepository;
use std::path::PathBuf;
use std::sync::Arc;

/// Provides a migrated private in-memory database.
#[fixture]
pub fn store() -> Arc<SqliteTrackerStore> {
    Arc::new(SqliteTrackerStore::in_memory().expect("in-memory database"))
}

/// Reconciles a one-server roster and returns the new server's id.
pub async fn seed_one(store: &SqliteTrackerStore) -> ServerId {
    store
        .reconcile(&[entry("s1", "Server one", 9000)], at_secs(0))
        .await
        .expect("reconcile");
    store
        .find_by_guid(&crate::test_helpers::guid("s1"))
        .await
        .expect("lookup")
        .expect("present")
        .id()
}

/// Database path unique to this process and `name`, removed on drop.
pub struct ScratchDatabase {
    path: PathBuf,
}

impl ScratchDatabase {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "server-tracker-{}-{name}.db",
            std::process::id()
        ));
        let scratch = Self { path };
        scratch.remove_files();
        scratch
    }

    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    fn remove_files(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            drop(std::fs::remove_file(file));
        }
    }
}

impl Drop for ScratchDatabase {
    fn drop(&mut self) {
        self.remove_files();
    }
}
