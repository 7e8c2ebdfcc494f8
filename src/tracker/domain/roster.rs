//! Roster entries as published by the external server list.

use super::ServerGuid;
use crate::probe::domain::ProbeTarget;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One server as described by the current roster.
///
/// Field names on the wire follow the roster document (`id`, `emu`,
/// `server_host`, `server_port`, ...). Empty URL strings are treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(rename = "id")]
    guid: ServerGuid,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "emu", default)]
    emulator: String,
    #[serde(rename = "server_host")]
    host: String,
    #[serde(rename = "server_port", deserialize_with = "deserialize_port")]
    port: u16,
    #[serde(rename = "type", default)]
    connection_type: String,
    #[serde(default)]
    status: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    website_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    discord_url: Option<String>,
}

impl RosterEntry {
    /// Creates a roster entry with empty descriptive fields.
    #[must_use]
    pub fn new(
        guid: ServerGuid,
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            guid,
            name: name.into(),
            description: String::new(),
            emulator: String::new(),
            host: host.into().trim().to_owned(),
            port,
            connection_type: String::new(),
            status: String::new(),
            website_url: None,
            discord_url: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the emulator tag.
    #[must_use]
    pub fn with_emulator(mut self, emulator: impl Into<String>) -> Self {
        self.emulator = emulator.into();
        self
    }

    /// Sets the connection type label.
    #[must_use]
    pub fn with_connection_type(mut self, connection_type: impl Into<String>) -> Self {
        self.connection_type = connection_type.into();
        self
    }

    /// Sets the status label published by the roster.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the website URL; an empty value clears it.
    #[must_use]
    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = non_empty(&url.into());
        self
    }

    /// Sets the Discord URL; an empty value clears it.
    #[must_use]
    pub fn with_discord_url(mut self, url: impl Into<String>) -> Self {
        self.discord_url = non_empty(&url.into());
        self
    }

    /// Returns the stable server GUID.
    #[must_use]
    pub const fn guid(&self) -> &ServerGuid {
        &self.guid
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the emulator tag.
    #[must_use]
    pub fn emulator(&self) -> &str {
        &self.emulator
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

    /// Returns the connection type label.
    #[must_use]
    pub fn connection_type(&self) -> &str {
        &self.connection_type
    }

    /// Returns the status label.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the website URL, if any.
    #[must_use]
    pub fn website_url(&self) -> Option<&str> {
        self.website_url.as_deref()
    }

    /// Returns the Discord URL, if any.
    #[must_use]
    pub fn discord_url(&self) -> Option<&str> {
        self.discord_url.as_deref()
    }

    /// Returns the address to probe for this server.
    #[must_use]
    pub fn target(&self) -> ProbeTarget {
        ProbeTarget::new(self.host.as_str(), self.port)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match RawPort::deserialize(deserializer)? {
        RawPort::Number(port) => Ok(port),
        RawPort::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|_| D::Error::custom(format!("invalid server port '{text}'"))),
    }
}

fn deserialize_optional_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|url| non_empty(&url)))
}
