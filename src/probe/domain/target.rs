//! Probe target addressing.

use super::ParseProbeTargetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host and UDP port of a server to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeTarget {
    host: String,
    port: u16,
}

impl ProbeTarget {
    /// Creates a probe target.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into().trim().to_owned(),
            port,
        }
    }

    /// Returns the host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the UDP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ProbeTarget {
    type Err = ParseProbeTargetError;

    /// Parses `host:port`, accepting bracketed IPv6 literals (`[::1]:9000`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (raw_host, raw_port) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| ParseProbeTargetError::MissingPort(trimmed.to_owned()))?;

        let host = raw_host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(raw_host);
        if host.is_empty() {
            return Err(ParseProbeTargetError::EmptyHost(trimmed.to_owned()));
        }

        let port = raw_port
            .parse::<u16>()
            .map_err(|_| ParseProbeTargetError::InvalidPort(raw_port.to_owned()))?;

        Ok(Self::new(host, port))
    }
}
