//! Layered runtime configuration.
//!
//! Settings are resolved from built-in defaults, then an optional
//! `server-tracker.{toml,json}` file in the working directory (or an explicit
//! path), then `TRACKER__`-prefixed environment variables using `__` as the
//! nesting separator, e.g. `TRACKER__PROBE__TIMEOUT_MS=2500`.

use crate::probe::services::{RetryPolicy, RetryPolicyError};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// File stem searched for in the working directory when no path is given.
pub const DEFAULT_SETTINGS_STEM: &str = "server-tracker";

const ENV_PREFIX: &str = "TRACKER";
const ENV_SEPARATOR: &str = "__";

/// Fully resolved tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerSettings {
    /// SQLite database location, or `:memory:`.
    pub database_url: String,
    /// JSON roster document read by the update cycle.
    #[serde(default)]
    pub roster_path: Option<PathBuf>,
    /// Probe and retry tuning.
    pub probe: ProbeSettings,
}

/// Probe timing and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProbeSettings {
    /// Per-phase network timeout in milliseconds.
    pub timeout_ms: u64,
    /// Attempts made by the tracked pipeline before recording a server down.
    pub max_attempts: u32,
    /// Minimum spacing between attempt starts, in milliseconds.
    pub retry_delay_ms: u64,
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A source could not be read or the merged values did not deserialise.
    #[error("failed to load settings: {0}")]
    Load(Arc<config::ConfigError>),
    /// The probe settings cannot form a retry policy.
    #[error("invalid probe settings")]
    InvalidProbe(#[source] RetryPolicyError),
    /// `database_url` is blank.
    #[error("database_url must not be empty")]
    EmptyDatabaseUrl,
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(Arc::new(err))
    }
}

impl TrackerSettings {
    /// Loads settings from the default file stem and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or the resulting
    /// settings fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads settings, reading `path` instead of the default file when given.
    ///
    /// An explicit path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or the resulting
    /// settings fail validation.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, None)
    }

    fn load_with(
        path: Option<&Path>,
        environment: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = path.map_or_else(
            || File::with_name(DEFAULT_SETTINGS_STEM).required(false),
            |explicit| File::from(explicit).required(true),
        );
        let settings: Self = Config::builder()
            .set_default("database_url", "./monitor.db")?
            .set_default("probe.timeout_ms", 5_000_i64)?
            .set_default("probe.max_attempts", 3_i64)?
            .set_default("probe.retry_delay_ms", 2_000_i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(environment),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the settings describe a usable tracker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDatabaseUrl`] or
    /// [`ConfigError::InvalidProbe`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        self.retry_policy().map(|_| ())
    }

    /// Returns the per-phase probe timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }

    /// Builds the retry policy used by the tracked pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProbe`] for zero attempts or a zero
    /// timeout.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::new(
            self.probe.max_attempts,
            Duration::from_millis(self.probe.retry_delay_ms),
            self.probe_timeout(),
        )
        .map_err(ConfigError::InvalidProbe)
    }
}
