//! Client configuration.
//!
//! Configuration the connection and protocol modules of a client consume:
//! who the client is, where it connects, and its timing knobs. The loaded
//! config is an ordinary component, so the conventional place for it is
//! the context's component bag:
//!
//! ```
//! use ircbus_runtime::{ClientConfig, Irc};
//!
//! let irc = Irc::new();
//! let config = ClientConfig::default();
//! irc.components().insert(config)?;
//! # Ok::<(), ircbus_component::ComponentError>(())
//! ```
//!
//! # Load Order
//!
//! [`ConfigLoader`] layers, later layers overriding earlier ones:
//!
//! 1. Compile-time defaults
//! 2. A TOML config file, when one is set and exists
//! 3. Environment variables (`IRCBUS_*`)

use ircbus_component::Component;
use ircbus_types::ErrorCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Who the client presents as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Primary nickname.
    pub nickname: String,
    /// Fallback nicknames tried in order when the primary is taken.
    pub alternates: Vec<String>,
    /// Username (ident) sent on registration.
    pub username: String,
    /// Real name (gecos) sent on registration.
    pub realname: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            nickname: "ircbus".into(),
            alternates: Vec::new(),
            username: "ircbus".into(),
            realname: "ircbus client".into(),
        }
    }
}

/// Where the client connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Whether to use TLS.
    pub tls: bool,
    /// Server password, if the network requires one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "irc.libera.chat".into(),
            port: 6697,
            tls: true,
            password: None,
        }
    }
}

/// Timing knobs for connection modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Connect attempt timeout, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Interval between client-initiated PINGs, in milliseconds.
    pub ping_interval_ms: u64,
    /// Delay before a reconnect attempt, in milliseconds.
    pub reconnect_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 30_000,
            ping_interval_ms: 120_000,
            reconnect_delay_ms: 5_000,
        }
    }
}

/// A client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Identity presented to the network.
    pub identity: IdentityConfig,
    /// Server endpoint.
    pub server: ServerConfig,
    /// Timing knobs.
    pub timing: TimingConfig,
}

impl ClientConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Parse`] on malformed TOML.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Serializes the config to TOML text.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Serialize`] when the config cannot be
    /// represented (not expected for well-formed configs).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string()))
    }
}

impl Component for ClientConfig {
    type Base = ClientConfig;
}

/// Configuration loader with builder-style setup.
///
/// # Example
///
/// ```no_run
/// use ircbus_runtime::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_file("ircbus.toml")
///     .load()?;
/// # Ok::<(), ircbus_runtime::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the config file to load.
    ///
    /// A missing file is not an error; the layer is skipped.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skips the environment variable layer.
    ///
    /// Useful for deterministic tests.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Loads and merges the configured layers.
    ///
    /// # Errors
    ///
    /// Fails when a configured file exists but cannot be read or parsed,
    /// or when an `IRCBUS_*` variable holds an unusable value.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();

        if let Some(ref path) = self.file {
            if let Some(loaded) = self.load_file(path)? {
                debug!(path = %path.display(), "loaded config file");
                config = loaded;
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    /// Reads one config file, returning `None` if it does not exist.
    fn load_file(&self, path: &Path) -> Result<Option<ClientConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::read(path, err))?;
        ClientConfig::from_toml(&text).map(Some)
    }
}

/// Applies `IRCBUS_*` environment overrides.
fn apply_env_vars(config: &mut ClientConfig) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var("IRCBUS_NICK") {
        config.identity.nickname = value;
    }
    if let Ok(value) = std::env::var("IRCBUS_HOST") {
        config.server.host = value;
    }
    if let Ok(value) = std::env::var("IRCBUS_PORT") {
        config.server.port = value
            .parse()
            .map_err(|_| ConfigError::invalid_env("IRCBUS_PORT", "expected a port number"))?;
    }
    if let Ok(value) = std::env::var("IRCBUS_TLS") {
        config.server.tls = parse_bool(&value)
            .ok_or_else(|| ConfigError::invalid_env("IRCBUS_TLS", "expected a bool"))?;
    }
    Ok(())
}

/// Parses a boolean from common spellings (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error.
///
/// Codes use the `CONFIG_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read config file {path}: {reason}")]
    Read {
        /// The file that failed.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// A config file exists but is not valid TOML for [`ClientConfig`].
    #[error("cannot parse config: {0}")]
    Parse(String),

    /// A config could not be serialized to TOML.
    #[error("cannot serialize config: {0}")]
    Serialize(String),

    /// An `IRCBUS_*` environment variable holds an unusable value.
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar {
        /// The variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    fn read(path: &Path, err: std::io::Error) -> Self {
        Self::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    fn invalid_env(var: &str, reason: &str) -> Self {
        Self::InvalidEnvVar {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG_READ",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Serialize(_) => "CONFIG_SERIALIZE",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
        }
    }

    fn is_recoverable(&self) -> bool {
        // a file read may succeed on retry; the rest needs fixing
        matches!(self, Self::Read { .. })
    }
}
