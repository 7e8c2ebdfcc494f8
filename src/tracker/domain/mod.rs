//! Domain model for tracked servers and their status history.
//!
//! Servers are never deleted; a server that drops off the roster is kept
//! with `is_listed` cleared so its history survives. Status records are
//! append-only and are grouped by UTC calendar day for uptime rollups.

mod calendar;
mod error;
mod ids;
mod reconcile;
mod roster;
mod server;
mod status;
mod uptime;

pub use calendar::{
    CALENDAR_LOOKBACK_DAYS, CalendarSlot, ROLLING_WINDOW_DAYS, calendar_grid_slots,
    rolling_window_days,
};
pub use error::TrackerDomainError;
pub use ids::{ServerGuid, ServerId, StatusId};
pub use reconcile::{ReconcileSummary, latest_entries};
pub use roster::RosterEntry;
pub use server::{PersistedServerData, TrackedServer};
pub use status::{StatusRecord, StatusSample};
pub use uptime::{CalendarDay, DailySamples, RttStats, UptimeClass, UptimeDay};
