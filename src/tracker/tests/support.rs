//! Shared fixtures for tracker unit tests.

use crate::tracker::domain::{RosterEntry, ServerGuid};
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use std::sync::{Mutex, PoisonError};

/// Clock that reports a settable instant.
#[derive(Debug)]
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn at_secs(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("valid timestamp")
}

pub fn at_rfc3339(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

pub fn guid(value: &str) -> ServerGuid {
    ServerGuid::new(value).expect("valid GUID")
}

pub fn entry(guid_value: &str, name: &str, port: u16) -> RosterEntry {
    RosterEntry::new(guid(guid_value), name, "127.0.0.1", port)
}
