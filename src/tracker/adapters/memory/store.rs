//! Thread-safe in-memory store for servers and status history.

use crate::tracker::{
    domain::{
        DailySamples, ReconcileSummary, RosterEntry, RttStats, ServerGuid, ServerId, StatusId,
        StatusRecord, StatusSample, TrackedServer, latest_entries,
    },
    ports::{ServerRepository, StatusRepository, TrackerRepositoryError, TrackerRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory implementation of both tracker repositories.
///
/// Suitable for unit and integration tests and for offline runs. Storage
/// failures can be injected per server to exercise partial-failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    servers: BTreeMap<ServerId, TrackedServer>,
    guid_index: HashMap<ServerGuid, ServerId>,
    statuses: Vec<StatusRecord>,
    last_server_id: i32,
    last_status_id: i64,
    failing_servers: HashSet<ServerId>,
    fail_next_reconcile: bool,
}

#[derive(Default)]
struct DayBucket {
    total: u32,
    up: u32,
    rtts: Vec<i64>,
}

impl InMemoryTrackerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent [`StatusRepository::record`] for `server_id`
    /// fail with a persistence error.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_recording_for(&self, server_id: ServerId) -> TrackerRepositoryResult<()> {
        self.write_state()?.failing_servers.insert(server_id);
        Ok(())
    }

    /// Makes the next [`ServerRepository::reconcile`] fail without applying
    /// any change.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_next_reconcile(&self) -> TrackerRepositoryResult<()> {
        self.write_state()?.fail_next_reconcile = true;
        Ok(())
    }

    /// Returns every stored status record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn all_statuses(&self) -> TrackerRepositoryResult<Vec<StatusRecord>> {
        Ok(self.read_state()?.statuses.clone())
    }

    /// Returns every stored server, listed or not, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn all_servers(&self) -> TrackerRepositoryResult<Vec<TrackedServer>> {
        Ok(self.read_state()?.servers.values().cloned().collect())
    }

    fn read_state(&self) -> TrackerRepositoryResult<RwLockReadGuard<'_, InMemoryTrackerState>> {
        self.state.read().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(&self) -> TrackerRepositoryResult<RwLockWriteGuard<'_, InMemoryTrackerState>> {
        self.state.write().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryTrackerState {
    fn upsert(&mut self, entry: &RosterEntry, now: DateTime<Utc>) -> bool {
        let existing = self
            .guid_index
            .get(entry.guid())
            .and_then(|server_id| self.servers.get_mut(server_id));
        if let Some(server) = existing {
            server.apply_roster_entry(entry.clone(), now);
            return false;
        }

        self.last_server_id = self.last_server_id.saturating_add(1);
        let server_id = ServerId::new(self.last_server_id);
        self.guid_index.insert(entry.guid().clone(), server_id);
        self.servers.insert(
            server_id,
            TrackedServer::from_roster(server_id, entry.clone(), now),
        );
        true
    }
}

#[async_trait]
impl ServerRepository for InMemoryTrackerStore {
    async fn reconcile(
        &self,
        roster: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<ReconcileSummary> {
        let mut state = self.write_state()?;
        if state.fail_next_reconcile {
            state.fail_next_reconcile = false;
            return Err(TrackerRepositoryError::persistence(std::io::Error::other(
                "injected reconcile failure",
            )));
        }

        for server in state.servers.values_mut() {
            server.mark_unlisted();
        }

        let mut summary = ReconcileSummary::default();
        for entry in latest_entries(roster) {
            if state.upsert(entry, now) {
                summary.created = summary.created.saturating_add(1);
            } else {
                summary.updated = summary.updated.saturating_add(1);
            }
        }
        summary.unlisted = state
            .servers
            .values()
            .filter(|server| !server.is_listed())
            .count();
        Ok(summary)
    }

    async fn find_by_guid(
        &self,
        guid: &ServerGuid,
    ) -> TrackerRepositoryResult<Option<TrackedServer>> {
        let state = self.read_state()?;
        Ok(state
            .guid_index
            .get(guid)
            .and_then(|server_id| state.servers.get(server_id))
            .cloned())
    }

    async fn find_by_id(
        &self,
        server_id: ServerId,
    ) -> TrackerRepositoryResult<Option<TrackedServer>> {
        Ok(self.read_state()?.servers.get(&server_id).cloned())
    }

    async fn list_listed(&self) -> TrackerRepositoryResult<Vec<TrackedServer>> {
        let state = self.read_state()?;
        let mut listed: Vec<TrackedServer> = state
            .servers
            .values()
            .filter(|server| server.is_listed())
            .cloned()
            .collect();
        listed.sort_by_cached_key(|server| (server.name().to_lowercase(), server.id()));
        Ok(listed)
    }

    async fn last_updated_at(&self) -> TrackerRepositoryResult<Option<DateTime<Utc>>> {
        Ok(self
            .read_state()?
            .servers
            .values()
            .map(TrackedServer::updated_at)
            .max())
    }
}

#[async_trait]
impl StatusRepository for InMemoryTrackerStore {
    async fn record(&self, sample: StatusSample) -> TrackerRepositoryResult<StatusRecord> {
        let mut state = self.write_state()?;
        let server_id = sample.server_id();
        if state.failing_servers.contains(&server_id) {
            return Err(TrackerRepositoryError::persistence(std::io::Error::other(
                format!("injected recording failure for server {server_id}"),
            )));
        }

        let server = state
            .servers
            .get_mut(&server_id)
            .ok_or(TrackerRepositoryError::UnknownServer(server_id))?;
        server.record_probe(sample.is_up(), sample.observed_at());

        state.last_status_id = state.last_status_id.saturating_add(1);
        let record = StatusRecord::new(StatusId::new(state.last_status_id), sample);
        state.statuses.push(record.clone());
        Ok(record)
    }

    async fn recent(
        &self,
        server_id: ServerId,
        limit: usize,
    ) -> TrackerRepositoryResult<Vec<StatusRecord>> {
        let state = self.read_state()?;
        let mut records: Vec<StatusRecord> = state
            .statuses
            .iter()
            .filter(|record| record.server_id() == server_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| Reverse((record.created_at(), record.id())));
        records.truncate(limit);
        Ok(records)
    }

    async fn daily_samples(
        &self,
        server_id: ServerId,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailySamples>> {
        let state = self.read_state()?;
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for record in &state.statuses {
            let day = record.created_at().date_naive();
            if record.server_id() != server_id || day < first_day || day > last_day {
                continue;
            }
            let bucket = buckets.entry(day).or_default();
            bucket.total = bucket.total.saturating_add(1);
            if record.is_up() {
                bucket.up = bucket.up.saturating_add(1);
            }
            if let Some(rtt) = record.sample().rtt_millis() {
                bucket.rtts.push(rtt);
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(day, bucket)| DailySamples {
                day,
                total: bucket.total,
                up: bucket.up,
                rtt: RttStats::from_millis(bucket.rtts),
            })
            .collect())
    }
}
