//! Scheme-qualified socket addresses (`tcp://host:port`, `unix:///path`).

use crate::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const TCP_PREFIX: &str = "tcp://";
const UNIX_PREFIX: &str = "unix://";

/// A socket address with its scheme.
///
/// The same grammar serves listen addresses for servers and remote addresses
/// for clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenUri {
    Tcp(String),
    Unix(PathBuf),
}

impl ListenUri {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let (uri, addr) = if let Some(addr) = s.strip_prefix(UNIX_PREFIX) {
            (ListenUri::Unix(PathBuf::from(addr)), addr)
        } else if let Some(addr) = s.strip_prefix(TCP_PREFIX) {
            (ListenUri::Tcp(addr.to_string()), addr)
        } else {
            return Err(ConfigError::InvalidUri {
                uri: s.to_string(),
                reason: "invalid prefix",
            });
        };
        if addr.is_empty() {
            return Err(ConfigError::InvalidUri {
                uri: s.to_string(),
                reason: "empty address",
            });
        }
        Ok(uri)
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            ListenUri::Tcp(_) => "tcp",
            ListenUri::Unix(_) => "unix",
        }
    }

    pub fn tcp_addr(&self) -> Option<&str> {
        match self {
            ListenUri::Tcp(addr) => Some(addr),
            ListenUri::Unix(_) => None,
        }
    }

    pub fn unix_path(&self) -> Option<&Path> {
        match self {
            ListenUri::Unix(path) => Some(path),
            ListenUri::Tcp(_) => None,
        }
    }
}

impl FromStr for ListenUri {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListenUri::parse(s)
    }
}

impl fmt::Display for ListenUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenUri::Tcp(addr) => write!(f, "{TCP_PREFIX}{addr}"),
            ListenUri::Unix(path) => write!(f, "{UNIX_PREFIX}{}", path.display()),
        }
    }
}
