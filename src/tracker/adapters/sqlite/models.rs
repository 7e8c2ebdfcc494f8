//! Diesel row models for tracker persistence.

use super::schema::{servers, statuses};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable, Text};

/// Query result row for server records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = servers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ServerRow {
    /// Internal server identifier.
    pub id: i32,
    /// Stable roster GUID.
    pub guid: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Emulator tag.
    pub emu: String,
    /// Host name or IP literal.
    pub host: String,
    /// UDP port.
    pub port: i32,
    /// Connection type label.
    pub connection_type: String,
    /// Status label.
    pub status: String,
    /// Optional website URL.
    pub website_url: Option<String>,
    /// Optional Discord URL.
    pub discord_url: Option<String>,
    /// Listing flag.
    pub is_listed: bool,
    /// Creation time in Unix seconds.
    pub created_at: i64,
    /// Update time in Unix seconds.
    pub updated_at: i64,
    /// Latest successful probe in Unix seconds.
    pub last_seen: Option<i64>,
    /// Outcome of the latest probe.
    pub is_online: Option<bool>,
}

/// Insert model for server records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = servers)]
pub struct NewServerRow {
    /// Stable roster GUID.
    pub guid: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Emulator tag.
    pub emu: String,
    /// Host name or IP literal.
    pub host: String,
    /// UDP port.
    pub port: i32,
    /// Connection type label.
    pub connection_type: String,
    /// Status label.
    pub status: String,
    /// Optional website URL.
    pub website_url: Option<String>,
    /// Optional Discord URL.
    pub discord_url: Option<String>,
    /// Listing flag.
    pub is_listed: bool,
    /// Creation time in Unix seconds.
    pub created_at: i64,
    /// Update time in Unix seconds.
    pub updated_at: i64,
}

/// Roster-driven changes applied to an existing server.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = servers, treat_none_as_null = true)]
pub struct ServerRosterChangeset {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Emulator tag.
    pub emu: String,
    /// Host name or IP literal.
    pub host: String,
    /// UDP port.
    pub port: i32,
    /// Connection type label.
    pub connection_type: String,
    /// Status label.
    pub status: String,
    /// Optional website URL.
    pub website_url: Option<String>,
    /// Optional Discord URL.
    pub discord_url: Option<String>,
    /// Listing flag.
    pub is_listed: bool,
    /// Update time in Unix seconds.
    pub updated_at: i64,
}

/// Query result row for status records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = statuses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatusRow {
    /// Internal record identifier.
    pub id: i64,
    /// Probed server.
    pub server_id: i32,
    /// Probe time in Unix seconds.
    pub created_at: i64,
    /// Whether the server answered.
    pub status: bool,
    /// Round-trip time in milliseconds.
    pub rtt: Option<i64>,
    /// Failure description.
    pub message: Option<String>,
}

/// Insert model for status records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = statuses)]
pub struct NewStatusRow {
    /// Probed server.
    pub server_id: i32,
    /// Probe time in Unix seconds.
    pub created_at: i64,
    /// Whether the server answered.
    pub status: bool,
    /// Round-trip time in milliseconds.
    pub rtt: Option<i64>,
    /// Failure description.
    pub message: Option<String>,
}

/// One row of the grouped per-day sample query.
#[derive(Debug, Clone, QueryableByName)]
pub struct DailySamplesRow {
    /// UTC day formatted as `YYYY-MM-DD`.
    #[diesel(sql_type = Text)]
    pub day: String,
    /// Number of samples.
    #[diesel(sql_type = BigInt)]
    pub n: i64,
    /// Number of up samples.
    #[diesel(sql_type = Nullable<BigInt>)]
    pub up_count: Option<i64>,
    /// Fastest RTT.
    #[diesel(sql_type = Nullable<BigInt>)]
    pub rtt_min: Option<i64>,
    /// Slowest RTT.
    #[diesel(sql_type = Nullable<BigInt>)]
    pub rtt_max: Option<i64>,
    /// Mean RTT.
    #[diesel(sql_type = Nullable<Double>)]
    pub rtt_mean: Option<f64>,
}
