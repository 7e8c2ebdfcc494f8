//! Shared fixtures for integration tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use server_tracker::tracker::domain::{RosterEntry, ServerGuid};

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

pub fn at_secs(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("valid timestamp")
}

pub fn guid(value: &str) -> ServerGuid {
    ServerGuid::new(value).expect("valid GUID")
}

/// Roster entry on the loopback interface.
pub fn entry(guid_value: &str, name: &str, port: u16) -> RosterEntry {
    RosterEntry::new(guid(guid_value), name, "127.0.0.1", port)
}
