//! File-backed databases and migrations.

use crate::sqlite::helpers::ScratchDatabase;
use crate::test_helpers::{at_secs, entry, guid};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use server_tracker::tracker::{
    adapters::sqlite::{SqliteTrackerStore, build_pool, run_migrations},
    ports::ServerRepository,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn data_survives_reopening() -> eyre::Result<()> {
    let database = ScratchDatabase::new("reopen");
    {
        let store = SqliteTrackerStore::open(&database.url())?;
        store
            .reconcile(&[entry("a", "Alpha", 9000)], at_secs(100))
            .await?;
    }

    let reopened = SqliteTrackerStore::open(&database.url())?;
    let server = reopened
        .find_by_guid(&guid("a"))
        .await?
        .ok_or_eyre("server should persist across reopen")?;

    ensure!(server.name() == "Alpha");
    ensure!(server.created_at() == at_secs(100));
    Ok(())
}

#[rstest]
fn migrations_are_idempotent() -> eyre::Result<()> {
    let database = ScratchDatabase::new("migrations");
    let pool = build_pool(&database.url(), 2)?;

    run_migrations(&pool)?;
    Ok(())
}
