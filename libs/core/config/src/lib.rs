//! Configuration structs for the gRPC security services.
//!
//! Every struct here can be bound to command-line flags (with an optional key
//! prefix such as `server.` or `health.`), loaded from the environment, checked
//! for emptiness and validated before any factory touches it.
//!
//! ```ignore
//! use clap::Command;
//! use core_config::{Configurable, ServerCfg};
//!
//! let mut server = ServerCfg::default();
//! let cmd = server.register_args(Command::new("svc"), "");
//! let matches = cmd.get_matches();
//! server.load_matches(&matches, "");
//! server.validate()?;
//! ```

pub mod apiservices;
pub mod args;
pub mod client;
pub mod event_notify;
pub mod files;
pub mod health;
pub mod listen;
pub mod logger;
pub mod network;
pub mod server;
pub mod tls;

pub use apiservices::ApiServicesCfg;
pub use client::ClientCfg;
pub use event_notify::EventNotifyCfg;
pub use health::HealthCfg;
pub use listen::ListenUri;
pub use logger::{LogFormat, LoggerCfg};
pub use network::IpFilter;
pub use server::ServerCfg;
pub use tls::{ClientTlsCfg, ServerTlsCfg};

use clap::{ArgMatches, Command};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid {field} '{value}': {reason}")]
    Invalid {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: &'static str },

    #[error("{what} '{}' doesn't exist", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::Invalid {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True when the error reports a missing file or directory rather than a
    /// malformed value.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. } | ConfigError::Io { .. })
    }
}

/// A configuration section that can be bound to flags, checked and validated.
///
/// `prefix` namespaces the keys: with prefix `health` the listen URI flag is
/// `--health.listenuri` and its environment variable `HEALTH_LISTENURI`.
pub trait Configurable: fmt::Debug {
    /// Adds this section's flags to `cmd`, using the current values as defaults.
    fn register_args(&self, cmd: Command, prefix: &str) -> Command;

    /// Reads back the values registered by [`Configurable::register_args`].
    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str);

    /// True when nothing is set, meaning the feature is disabled.
    fn is_empty(&self) -> bool;

    fn validate(&self) -> ConfigResult<()>;

    fn dump(&self) -> String {
        format!("{self:?}")
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env(prefix: &str) -> ConfigResult<Self>;
}

/// Helper to load and parse environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `key` when it is set, keeping `default` otherwise.
pub fn env_parse_or<T>(key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Reads a comma separated list, keeping `default` when `key` is unset.
pub fn env_list_or(key: &str, default: &[String]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => default.to_vec(),
    }
}
