//! Logger configuration
//!
//! Every knob has a default, so `LoggerConfig::default()` describes a logger
//! pushing to `graylog-radis` on `localhost:6379`. Values can also come from
//! the environment, see [`LoggerConfig::from_env`].

use super::error::{LoggerError, Result};
use super::log_level::SeverityLevel;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_SERVER: &str = "localhost:6379";
pub const DEFAULT_QUEUE: &str = "graylog-radis";
pub const DEFAULT_LEVEL: SeverityLevel = 6;

/// Queue server, `host:port`.
pub const RADIS_SERVER_ENV: &str = "RADIS_SERVER";

/// Queue (list) name.
pub const RADIS_QUEUE_ENV: &str = "RADIS_QUEUE";

/// Level used when a call gives none, 1-9.
pub const RADIS_DEFAULT_LEVEL_ENV: &str = "RADIS_DEFAULT_LEVEL";

/// Overrides the machine hostname in the `host` field.
pub const RADIS_HOSTNAME_ENV: &str = "RADIS_HOSTNAME";

/// `1`/`true` keeps records in memory instead of pushing them.
pub const RADIS_DRY_RUN_ENV: &str = "RADIS_DRY_RUN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Queue server in `host:port` form
    pub server: String,
    /// Name of the list records are pushed onto
    pub queue: String,
    /// Level used when a call gives none
    pub default_level: SeverityLevel,
    /// Value of the `host` field; the machine hostname when unset
    pub hostname: Option<String>,
    /// Keep records in memory instead of pushing them
    pub dry_run: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            queue: DEFAULT_QUEUE.to_string(),
            default_level: DEFAULT_LEVEL,
            hostname: None,
            dry_run: false,
        }
    }
}

impl LoggerConfig {
    /// Read configuration from `RADIS_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(server) = lookup(RADIS_SERVER_ENV) {
            config.server = server;
        }
        if let Some(queue) = lookup(RADIS_QUEUE_ENV) {
            config.queue = queue;
        }
        if let Some(level) = lookup(RADIS_DEFAULT_LEVEL_ENV) {
            config.default_level = level.trim().parse().map_err(|_| {
                LoggerError::config(RADIS_DEFAULT_LEVEL_ENV, format!("'{}' is not a number", level))
            })?;
        }
        if let Some(hostname) = lookup(RADIS_HOSTNAME_ENV).filter(|h| !h.is_empty()) {
            config.hostname = Some(hostname);
        }
        if let Some(flag) = lookup(RADIS_DRY_RUN_ENV) {
            config.dry_run = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        validate_level(self.default_level)?;
        if self.queue.is_empty() {
            return Err(LoggerError::config("LoggerConfig", "queue name is empty"));
        }
        parse_server(&self.server)?;
        Ok(())
    }
}

/// Check that a default level is a single digit between 1 and 9
pub fn validate_level(level: SeverityLevel) -> Result<()> {
    if (1..=9).contains(&level) {
        Ok(())
    } else {
        Err(LoggerError::config(
            "LoggerConfig",
            format!("default level {} out of range 1-9", level),
        ))
    }
}

/// Split `host:port`; an empty host means `localhost` and an empty or
/// missing port means `6379`
pub fn parse_server(server: &str) -> Result<(String, u16)> {
    let (host, port) = server.split_once(':').unwrap_or((server, ""));
    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    let port = if port.is_empty() {
        DEFAULT_PORT
    } else {
        port.parse()
            .map_err(|_| LoggerError::config("server", format!("invalid port in '{}'", server)))?
    };
    Ok((host.to_string(), port))
}
