//! TLS settings for gRPC clients and servers.

use crate::files::file_exists;
use crate::ConfigError;
use std::path::PathBuf;

fn check_file(field: &'static str, path: &str) -> Result<(), ConfigError> {
    if file_exists(path) {
        Ok(())
    } else {
        Err(ConfigError::NotFound {
            what: field,
            path: PathBuf::from(path),
        })
    }
}

/// Client side TLS: optional client identity, pinned server cert, CA roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTlsCfg {
    pub cert_file: String,
    pub key_file: String,
    pub server_cert: String,
    pub server_name: String,
    pub ca_cert: String,
    pub use_system_cas: bool,
}

impl ClientTlsCfg {
    pub fn use_tls(&self) -> bool {
        !self.cert_file.is_empty()
            || !self.key_file.is_empty()
            || !self.server_cert.is_empty()
            || !self.server_name.is_empty()
            || !self.ca_cert.is_empty()
            || self.use_system_cas
    }

    pub fn has_identity(&self) -> bool {
        !self.cert_file.is_empty() && !self.key_file.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.cert_file.is_empty(), self.key_file.is_empty()) {
            (false, true) => return Err(ConfigError::Required("client key file")),
            (true, false) => return Err(ConfigError::Required("client cert file")),
            (false, false) => {
                check_file("client cert file", &self.cert_file)?;
                check_file("client key file", &self.key_file)?;
            }
            (true, true) => {}
        }
        if !self.server_cert.is_empty() {
            check_file("server cert file", &self.server_cert)?;
        }
        if !self.ca_cert.is_empty() {
            check_file("ca cert file", &self.ca_cert)?;
        }
        Ok(())
    }
}

/// Server side TLS: identity plus optional client verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerTlsCfg {
    pub cert_file: String,
    pub key_file: String,
    pub ca_cert: String,
    pub client_auth: bool,
}

impl ServerTlsCfg {
    pub fn use_tls(&self) -> bool {
        !self.cert_file.is_empty() || !self.key_file.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cert_file.is_empty() {
            return Err(ConfigError::Required("server cert file"));
        }
        if self.key_file.is_empty() {
            return Err(ConfigError::Required("server key file"));
        }
        check_file("server cert file", &self.cert_file)?;
        check_file("server key file", &self.key_file)?;
        if !self.ca_cert.is_empty() {
            check_file("ca cert file", &self.ca_cert)?;
        } else if self.client_auth {
            return Err(ConfigError::Required("ca cert file for client auth"));
        }
        Ok(())
    }
}
