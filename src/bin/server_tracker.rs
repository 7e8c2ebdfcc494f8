//! Command-line front end for the server tracker.
//!
//! Usage:
//!
//! ```text
//! server_tracker [--config <path>] <command> [arguments]
//! ```
//!
//! Commands:
//!
//! - `cycle`: fetch the roster file, reconcile it and record one status per
//!   server
//! - `sweep`: probe every roster entry once, concurrently, without storing
//!   anything
//! - `check <host:port>`: probe one address with the configured retries
//! - `servers`: list the servers currently on the roster
//! - `uptime <guid>`: print the rolling 15-day uptime window
//! - `calendar <guid>`: print the calendar heat-map cells
//! - `statuses <guid> [limit]`: print the newest status samples
//!
//! Settings come from `server-tracker.toml` (or `--config`) and `TRACKER__*`
//! environment variables. Logs go to stderr and honour `RUST_LOG`.

use mockable::DefaultClock;
use server_tracker::probe::adapters::UdpProber;
use server_tracker::probe::domain::{ParseProbeTargetError, ProbeTarget};
use server_tracker::settings::{ConfigError, TrackerSettings};
use server_tracker::telemetry::init_tracing;
use server_tracker::tracker::adapters::JsonFileRosterSource;
use server_tracker::tracker::adapters::sqlite::{SqliteSetupError, SqliteTrackerStore};
use server_tracker::tracker::domain::{
    CalendarDay, ServerGuid, StatusRecord, TrackedServer, TrackerDomainError, UptimeDay,
};
use server_tracker::tracker::ports::{
    DEFAULT_HISTORY_LIMIT, RosterFetchError, RosterSource, ServerRepository, StatusRepository,
    TrackerRepositoryError,
};
use server_tracker::tracker::services::{
    CycleError, CycleReport, RosterSweep, SweepResult, TrackerServiceError, UpdateCycle,
    UptimeAggregator,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end a command.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("invalid server GUID: {0}")]
    InvalidGuid(#[from] TrackerDomainError),
    #[error("invalid probe target: {0}")]
    InvalidTarget(#[from] ParseProbeTargetError),
    #[error(transparent)]
    Settings(#[from] ConfigError),
    #[error("roster_path is not configured")]
    MissingRosterPath,
    #[error("failed to open database: {0}")]
    Storage(#[from] SqliteSetupError),
    #[error(transparent)]
    Roster(#[from] RosterFetchError),
    #[error("update cycle failed: {0}")]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Service(#[from] TrackerServiceError),
    #[error("no tracked server with GUID {0}")]
    UnknownServer(ServerGuid),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<TrackerRepositoryError> for CliError {
    fn from(err: TrackerRepositoryError) -> Self {
        Self::Service(err.into())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Cycle,
    Sweep,
    Check(ProbeTarget),
    Servers,
    Uptime(ServerGuid),
    Calendar(ServerGuid),
    Statuses { guid: ServerGuid, limit: usize },
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    config: Option<PathBuf>,
    command: Command,
}

fn main() -> Result<(), BoxError> {
    init_tracing()?;
    let invocation = parse_args(std::env::args())?;
    let settings = TrackerSettings::load_from(invocation.config.as_deref())?;
    let runtime = build_runtime()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime
        .block_on(execute(&settings, invocation.command, &mut out))
        .map_err(|err| -> BoxError {
            tracing::error!(error = %err, "command failed");
            err.into()
        })
}

fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, CliError> {
    let _program = args.next();
    let mut config = None;
    let mut name = args
        .next()
        .ok_or_else(|| CliError::InvalidArgs("missing command".into()))?;
    if name == "--config" {
        let path = args
            .next()
            .ok_or_else(|| CliError::InvalidArgs("--config requires a path".into()))?;
        config = Some(PathBuf::from(path));
        name = args
            .next()
            .ok_or_else(|| CliError::InvalidArgs("missing command".into()))?;
    }

    let command = match name.as_str() {
        "cycle" => Command::Cycle,
        "sweep" => Command::Sweep,
        "servers" => Command::Servers,
        "check" => Command::Check(
            required(&mut args, "check", "host:port")?.parse::<ProbeTarget>()?,
        ),
        "uptime" => Command::Uptime(ServerGuid::new(required(&mut args, "uptime", "guid")?)?),
        "calendar" => {
            Command::Calendar(ServerGuid::new(required(&mut args, "calendar", "guid")?)?)
        }
        "statuses" => {
            let guid = ServerGuid::new(required(&mut args, "statuses", "guid")?)?;
            let limit = match args.next() {
                Some(raw) => raw.parse::<usize>().map_err(|_| {
                    CliError::InvalidArgs(format!("invalid limit '{raw}'"))
                })?,
                None => DEFAULT_HISTORY_LIMIT,
            };
            Command::Statuses { guid, limit }
        }
        other => {
            return Err(CliError::InvalidArgs(format!(
                "unknown command '{other}'; expected cycle, sweep, check, servers, uptime, \
                 calendar or statuses"
            )));
        }
    };

    if let Some(extra) = args.next() {
        return Err(CliError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok(Invocation { config, command })
}

fn required(
    args: &mut impl Iterator<Item = String>,
    command: &str,
    what: &str,
) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::InvalidArgs(format!("{command} requires a {what} argument")))
}

async fn execute(
    settings: &TrackerSettings,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Cycle => {
            let cycle = UpdateCycle::new(
                Arc::new(SqliteTrackerStore::open(&settings.database_url)?),
                Arc::new(UdpProber::new()),
                Arc::new(roster_source(settings)?),
                settings.retry_policy()?,
                Arc::new(DefaultClock),
            );
            let report = cycle.run().await?;
            write_cycle_report(out, &report)?;
        }
        Command::Sweep => {
            let roster = roster_source(settings)?.fetch().await?;
            let sweep = RosterSweep::new(Arc::new(UdpProber::new()), settings.probe_timeout());
            write_sweep(out, &sweep.check_all(&roster).await)?;
        }
        Command::Check(target) => {
            let report = settings
                .retry_policy()?
                .check_with_retry(&UdpProber::new(), &target)
                .await;
            match report.error() {
                None => writeln!(
                    out,
                    "UP {target} rtt={}ms attempts={}",
                    report.last_report().rtt().as_millis(),
                    report.attempts_used()
                )?,
                Some(err) => writeln!(out, "DOWN {err}: {}", err.last_failure())?,
            }
        }
        Command::Servers => {
            let store = SqliteTrackerStore::open(&settings.database_url)?;
            write_servers(out, &store.list_listed().await?)?;
        }
        Command::Uptime(guid) => {
            let store = Arc::new(SqliteTrackerStore::open(&settings.database_url)?);
            let server = tracked(store.as_ref(), guid).await?;
            let days = UptimeAggregator::new(store, Arc::new(DefaultClock))
                .rolling_window(server.id())
                .await?;
            write_uptime(out, &days)?;
        }
        Command::Calendar(guid) => {
            let store = Arc::new(SqliteTrackerStore::open(&settings.database_url)?);
            let server = tracked(store.as_ref(), guid).await?;
            let cells = UptimeAggregator::new(store, Arc::new(DefaultClock))
                .calendar_grid(server.id())
                .await?;
            write_calendar(out, &cells)?;
        }
        Command::Statuses { guid, limit } => {
            let store = SqliteTrackerStore::open(&settings.database_url)?;
            let server = tracked(&store, guid).await?;
            write_statuses(out, &store.recent(server.id(), limit).await?)?;
        }
    }
    Ok(())
}

fn roster_source(settings: &TrackerSettings) -> Result<JsonFileRosterSource, CliError> {
    settings
        .roster_path
        .as_ref()
        .map(JsonFileRosterSource::new)
        .ok_or(CliError::MissingRosterPath)
}

async fn tracked(store: &SqliteTrackerStore, guid: ServerGuid) -> Result<TrackedServer, CliError> {
    store
        .find_by_guid(&guid)
        .await?
        .ok_or(CliError::UnknownServer(guid))
}

fn write_cycle_report(out: &mut impl Write, report: &CycleReport) -> io::Result<()> {
    writeln!(
        out,
        "roster: {} created, {} updated, {} unlisted",
        report.summary.created, report.summary.updated, report.summary.unlisted
    )?;
    writeln!(
        out,
        "statuses: {} recorded, {} up, {} failed",
        report.recording.recorded.len(),
        report.recording.up_count(),
        report.recording.failures.len()
    )?;
    for failure in &report.recording.failures {
        writeln!(out, "failed {}: {}", failure.guid, failure.error)?;
    }
    Ok(())
}

fn write_sweep(out: &mut impl Write, results: &[SweepResult]) -> io::Result<()> {
    for result in results {
        writeln!(
            out,
            "{:<5} {} ({})",
            result.status.as_str(),
            result.name,
            result.target
        )?;
    }
    Ok(())
}

fn write_servers(out: &mut impl Write, servers: &[TrackedServer]) -> io::Result<()> {
    for server in servers {
        let state = match server.is_online() {
            Some(true) => "online",
            Some(false) => "offline",
            None => "unknown",
        };
        let last_seen = server
            .last_seen()
            .map_or_else(|| "never".to_owned(), |seen| seen.to_rfc3339());
        writeln!(
            out,
            "{} {} {} {state} last_seen={last_seen}",
            server.guid(),
            server.name(),
            server.target()
        )?;
    }
    Ok(())
}

fn write_uptime(out: &mut impl Write, days: &[UptimeDay]) -> io::Result<()> {
    for day in days {
        writeln!(
            out,
            "{} {:>5}% n={} rtt={}/{}/{} {}",
            day.day(),
            day.uptime_label(),
            day.samples(),
            day.rtt_min_label(),
            day.rtt_mean_label(),
            day.rtt_max_label(),
            day.class()
        )?;
    }
    Ok(())
}

fn write_calendar(out: &mut impl Write, cells: &[CalendarDay]) -> io::Result<()> {
    for cell in cells {
        writeln!(
            out,
            "w{:02} d{} {} {}% {}",
            cell.week,
            cell.day_offset,
            cell.uptime.day(),
            cell.uptime.uptime_label(),
            cell.uptime.class()
        )?;
    }
    Ok(())
}

fn write_statuses(out: &mut impl Write, records: &[StatusRecord]) -> io::Result<()> {
    for record in records {
        let created_at = record.created_at().to_rfc3339();
        if record.is_up() {
            let rtt = record.rtt().map_or(0, |rtt| rtt.as_millis());
            writeln!(out, "{created_at} UP {rtt}ms")?;
        } else {
            writeln!(out, "{created_at} DOWN {}", record.message().unwrap_or(""))?;
        }
    }
    Ok(())
}
