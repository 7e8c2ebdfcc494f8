//! `SQLite` repository implementation for servers and status history.

use super::{
    models::{
        DailySamplesRow, NewServerRow, NewStatusRow, ServerRosterChangeset, ServerRow, StatusRow,
    },
    pool::{IN_MEMORY_URL, SqliteSetupError, TrackerSqlitePool, build_pool},
    schema::{servers, statuses},
};
use crate::tracker::{
    domain::{
        DailySamples, PersistedServerData, ReconcileSummary, RosterEntry, RttStats, ServerGuid,
        ServerId, StatusId, StatusRecord, StatusSample, TrackedServer, TrackerDomainError,
        latest_entries,
    },
    ports::{ServerRepository, StatusRepository, TrackerRepositoryError, TrackerRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use tracing::debug;

/// Grouped per-day sample counts for one server over a day range.
const DAILY_SAMPLES_QUERY: &str = "\
    SELECT date(created_at, 'unixepoch') AS day, \
           COUNT(*) AS n, \
           SUM(status) AS up_count, \
           MIN(rtt) AS rtt_min, \
           MAX(rtt) AS rtt_max, \
           AVG(rtt) AS rtt_mean \
    FROM statuses \
    WHERE server_id = ? \
      AND date(created_at, 'unixepoch') BETWEEN ? AND ? \
    GROUP BY day \
    ORDER BY day";

/// `SQLite`-backed implementation of both tracker repositories.
#[derive(Debug, Clone)]
pub struct SqliteTrackerStore {
    pool: TrackerSqlitePool,
}

impl SqliteTrackerStore {
    /// Creates a store from an already migrated pool.
    #[must_use]
    pub const fn new(pool: TrackerSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens `database_url`, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSetupError`] when the database cannot be opened or
    /// migrated.
    pub fn open(database_url: &str) -> Result<Self, SqliteSetupError> {
        Ok(Self::new(build_pool(database_url, 4)?))
    }

    /// Opens a fresh private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSetupError`] when the schema cannot be created.
    pub fn in_memory() -> Result<Self, SqliteSetupError> {
        Ok(Self::new(build_pool(IN_MEMORY_URL, 1)?))
    }

    async fn run_blocking<F, T>(&self, operation: F) -> TrackerRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TrackerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(TrackerRepositoryError::persistence)?
    }
}

#[async_trait]
impl ServerRepository for SqliteTrackerStore {
    async fn reconcile(
        &self,
        roster: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<ReconcileSummary> {
        let entries: Vec<RosterEntry> = latest_entries(roster).into_iter().cloned().collect();
        let timestamp = now.timestamp();

        self.run_blocking(move |connection| {
            connection
                .immediate_transaction::<_, DieselError, _>(|tx| {
                    diesel::update(servers::table)
                        .set(servers::is_listed.eq(false))
                        .execute(tx)?;

                    let mut summary = ReconcileSummary::default();
                    for entry in &entries {
                        let guid = entry.guid().as_str();
                        let touched = diesel::update(servers::table.filter(servers::guid.eq(guid)))
                            .set(&roster_changeset(entry, timestamp))
                            .execute(tx)?;
                        if touched == 0 {
                            diesel::insert_into(servers::table)
                                .values(&new_server_row(entry, timestamp))
                                .execute(tx)?;
                            summary.created = summary.created.saturating_add(1);
                        } else {
                            summary.updated = summary.updated.saturating_add(1);
                        }
                    }

                    let unlisted: i64 = servers::table
                        .filter(servers::is_listed.eq(false))
                        .count()
                        .get_result(tx)?;
                    summary.unlisted = usize::try_from(unlisted).unwrap_or(usize::MAX);
                    Ok(summary)
                })
                .map_err(TrackerRepositoryError::persistence)
        })
        .await
    }

    async fn find_by_guid(
        &self,
        guid: &ServerGuid,
    ) -> TrackerRepositoryResult<Option<TrackedServer>> {
        let guid_value = guid.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = servers::table
                .filter(servers::guid.eq(&guid_value))
                .select(ServerRow::as_select())
                .first::<ServerRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            row.map(row_to_server).transpose()
        })
        .await
    }

    async fn find_by_id(
        &self,
        server_id: ServerId,
    ) -> TrackerRepositoryResult<Option<TrackedServer>> {
        self.run_blocking(move |connection| {
            let row = servers::table
                .filter(servers::id.eq(server_id.into_inner()))
                .select(ServerRow::as_select())
                .first::<ServerRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            row.map(row_to_server).transpose()
        })
        .await
    }

    async fn list_listed(&self) -> TrackerRepositoryResult<Vec<TrackedServer>> {
        let mut listed = self
            .run_blocking(move |connection| {
                let rows = servers::table
                    .filter(servers::is_listed.eq(true))
                    .select(ServerRow::as_select())
                    .load::<ServerRow>(connection)
                    .map_err(TrackerRepositoryError::persistence)?;
                rows.into_iter()
                    .map(row_to_server)
                    .collect::<TrackerRepositoryResult<Vec<_>>>()
            })
            .await?;
        listed.sort_by_cached_key(|server| (server.name().to_lowercase(), server.id()));
        Ok(listed)
    }

    async fn last_updated_at(&self) -> TrackerRepositoryResult<Option<DateTime<Utc>>> {
        self.run_blocking(move |connection| {
            let latest: Option<i64> = servers::table
                .select(diesel::dsl::max(servers::updated_at))
                .first(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            latest.map(timestamp_from_secs).transpose()
        })
        .await
    }
}

#[async_trait]
impl StatusRepository for SqliteTrackerStore {
    async fn record(&self, sample: StatusSample) -> TrackerRepositoryResult<StatusRecord> {
        let server_id = sample.server_id();
        let raw_server_id = server_id.into_inner();
        let timestamp = sample.observed_at().timestamp();
        let up = sample.is_up();
        let new_row = NewStatusRow {
            server_id: raw_server_id,
            created_at: timestamp,
            status: up,
            rtt: sample.rtt_millis(),
            message: sample.message().map(str::to_owned),
        };

        let inserted = self
            .run_blocking(move |connection| {
                connection
                    .immediate_transaction::<_, DieselError, _>(|tx| {
                        let stored_last_seen = servers::table
                            .filter(servers::id.eq(raw_server_id))
                            .select(servers::last_seen)
                            .first::<Option<i64>>(tx)
                            .optional()?;
                        let Some(last_seen) = stored_last_seen else {
                            return Ok(None);
                        };

                        let status_id: i64 = diesel::insert_into(statuses::table)
                            .values(&new_row)
                            .returning(statuses::id)
                            .get_result(tx)?;

                        if up && last_seen.is_none_or(|seen| timestamp > seen) {
                            diesel::update(servers::table.filter(servers::id.eq(raw_server_id)))
                                .set(servers::last_seen.eq(timestamp))
                                .execute(tx)?;
                        }

                        diesel::update(servers::table.filter(servers::id.eq(raw_server_id)))
                            .set(servers::is_online.eq(up))
                            .execute(tx)?;
                        Ok(Some(status_id))
                    })
                    .map_err(TrackerRepositoryError::persistence)
            })
            .await?;

        let status_id = inserted.ok_or(TrackerRepositoryError::UnknownServer(server_id))?;
        debug!(%server_id, %status_id, up, "recorded status");
        Ok(StatusRecord::new(StatusId::new(status_id), sample))
    }

    async fn recent(
        &self,
        server_id: ServerId,
        limit: usize,
    ) -> TrackerRepositoryResult<Vec<StatusRecord>> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = statuses::table
                .filter(statuses::server_id.eq(server_id.into_inner()))
                .order((statuses::created_at.desc(), statuses::id.desc()))
                .limit(row_limit)
                .select(StatusRow::as_select())
                .load::<StatusRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_status).collect()
        })
        .await
    }

    async fn daily_samples(
        &self,
        server_id: ServerId,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailySamples>> {
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(DAILY_SAMPLES_QUERY)
                .bind::<Integer, _>(server_id.into_inner())
                .bind::<Text, _>(first_day.to_string())
                .bind::<Text, _>(last_day.to_string())
                .load::<DailySamplesRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_daily_samples).collect()
        })
        .await
    }
}

fn roster_changeset(entry: &RosterEntry, timestamp: i64) -> ServerRosterChangeset {
    ServerRosterChangeset {
        name: entry.name().to_owned(),
        description: entry.description().to_owned(),
        emu: entry.emulator().to_owned(),
        host: entry.host().to_owned(),
        port: i32::from(entry.port()),
        connection_type: entry.connection_type().to_owned(),
        status: entry.status().to_owned(),
        website_url: entry.website_url().map(str::to_owned),
        discord_url: entry.discord_url().map(str::to_owned),
        is_listed: true,
        updated_at: timestamp,
    }
}

fn new_server_row(entry: &RosterEntry, timestamp: i64) -> NewServerRow {
    let ServerRosterChangeset {
        name,
        description,
        emu,
        host,
        port,
        connection_type,
        status,
        website_url,
        discord_url,
        is_listed,
        updated_at,
    } = roster_changeset(entry, timestamp);

    NewServerRow {
        guid: entry.guid().as_str().to_owned(),
        name,
        description,
        emu,
        host,
        port,
        connection_type,
        status,
        website_url,
        discord_url,
        is_listed,
        created_at: timestamp,
        updated_at,
    }
}

fn timestamp_from_secs(seconds: i64) -> TrackerRepositoryResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        TrackerRepositoryError::invalid_persisted_data(TrackerDomainError::TimestampOutOfRange(
            seconds,
        ))
    })
}

fn row_to_server(row: ServerRow) -> TrackerRepositoryResult<TrackedServer> {
    let ServerRow {
        id,
        guid,
        name,
        description,
        emu,
        host,
        port,
        connection_type,
        status,
        website_url,
        discord_url,
        is_listed,
        created_at,
        updated_at,
        last_seen,
        is_online,
    } = row;

    let parsed_guid =
        ServerGuid::new(guid).map_err(TrackerRepositoryError::invalid_persisted_data)?;
    let parsed_port = u16::try_from(port).map_err(|_| {
        TrackerRepositoryError::invalid_persisted_data(TrackerDomainError::InvalidPort(
            i64::from(port),
        ))
    })?;

    let mut entry = RosterEntry::new(parsed_guid, name, host, parsed_port)
        .with_description(description)
        .with_emulator(emu)
        .with_connection_type(connection_type)
        .with_status(status);
    if let Some(url) = website_url {
        entry = entry.with_website_url(url);
    }
    if let Some(url) = discord_url {
        entry = entry.with_discord_url(url);
    }

    let data = PersistedServerData {
        id: ServerId::new(id),
        entry,
        is_listed,
        is_online,
        created_at: timestamp_from_secs(created_at)?,
        updated_at: timestamp_from_secs(updated_at)?,
        last_seen: last_seen.map(timestamp_from_secs).transpose()?,
    };
    Ok(TrackedServer::from_persisted(data))
}

fn row_to_status(row: StatusRow) -> TrackerRepositoryResult<StatusRecord> {
    let rtt = row
        .rtt
        .map(|millis| {
            u64::try_from(millis).map(Duration::from_millis).map_err(|_| {
                TrackerRepositoryError::invalid_persisted_data(TrackerDomainError::NegativeRtt(
                    millis,
                ))
            })
        })
        .transpose()?;
    let sample = StatusSample::from_parts(
        ServerId::new(row.server_id),
        timestamp_from_secs(row.created_at)?,
        row.status,
        rtt,
        row.message,
    );
    Ok(StatusRecord::new(StatusId::new(row.id), sample))
}

fn row_to_daily_samples(row: DailySamplesRow) -> TrackerRepositoryResult<DailySamples> {
    let day = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d")
        .map_err(TrackerRepositoryError::invalid_persisted_data)?;
    let total = u32::try_from(row.n).map_err(TrackerRepositoryError::invalid_persisted_data)?;
    let up = u32::try_from(row.up_count.unwrap_or(0))
        .map_err(TrackerRepositoryError::invalid_persisted_data)?;
    let rtt = match (row.rtt_min, row.rtt_max, row.rtt_mean) {
        (Some(min_ms), Some(max_ms), Some(mean_ms)) => Some(RttStats {
            min_ms,
            max_ms,
            mean_ms,
        }),
        _ => None,
    };
    Ok(DailySamples {
        day,
        total,
        up,
        rtt,
    })
}
