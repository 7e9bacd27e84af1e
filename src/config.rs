//! Runtime configuration parsed from environment variables.
//!
//! `dotenvy` loads a `.env` file (if present) before the variables are read;
//! command-line flags in `main` override what is found here.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ErrorCode;
use crate::registry::ConstraintPolicy;

pub const DEFAULT_BIND: &str = "127.0.0.1:8765";
pub const DEFAULT_AGENT_WS: &str = "ws://localhost:8765/ws";
pub const DEFAULT_RELAY_URL: &str = "http://localhost:8765";
pub const DEFAULT_RECONNECT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "E_CONFIG_PARSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Relay listen address.
    pub bind: SocketAddr,
    /// Websocket URL the client connects to.
    pub agent_ws_url: String,
    /// Relay base URL used by the emitter.
    pub relay_url: String,
    /// Fixed wait between reconnect attempts.
    pub reconnect_delay: Duration,
    pub constraint_policy: ConstraintPolicy,
}

impl Config {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `VIEWDECK_BIND`: default `127.0.0.1:8765`
    /// - `VIEWDECK_AGENT_WS`: default `ws://localhost:8765/ws`
    /// - `VIEWDECK_RELAY_URL`: default `http://localhost:8765`
    /// - `VIEWDECK_RECONNECT_SECS`: default 5
    /// - `VIEWDECK_CONSTRAINT_POLICY`: `advisory` (default) or `enforce`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for any variable that is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("VIEWDECK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key: "VIEWDECK_BIND", value: bind_raw.clone() })?;

        let agent_ws_url = lookup("VIEWDECK_AGENT_WS").unwrap_or_else(|| DEFAULT_AGENT_WS.to_owned());
        let relay_url = lookup("VIEWDECK_RELAY_URL")
            .unwrap_or_else(|| DEFAULT_RELAY_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let reconnect_secs = match lookup("VIEWDECK_RECONNECT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue { key: "VIEWDECK_RECONNECT_SECS", value: raw })?,
            None => DEFAULT_RECONNECT_SECS,
        };

        let constraint_policy = parse_policy(lookup("VIEWDECK_CONSTRAINT_POLICY").as_deref())?;

        Ok(Self {
            bind,
            agent_ws_url,
            relay_url,
            reconnect_delay: Duration::from_secs(reconnect_secs),
            constraint_policy,
        })
    }
}

/// Parse a constraint policy name. `None` means the default.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for names other than `advisory` and
/// `enforce`.
pub fn parse_policy(raw: Option<&str>) -> Result<ConstraintPolicy, ConfigError> {
    match raw.unwrap_or("advisory") {
        "advisory" => Ok(ConstraintPolicy::Advisory),
        "enforce" => Ok(ConstraintPolicy::Enforce),
        other => Err(ConfigError::InvalidValue { key: "VIEWDECK_CONSTRAINT_POLICY", value: other.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
