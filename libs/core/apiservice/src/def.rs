//! Service definition files.
//!
//! A definitions file is a JSON array:
//!
//! ```json
//! [
//!   { "id": "notify", "api": "luids.event.v1.Notify", "endpoint": "tcp://127.0.0.1:5851",
//!     "cacert": "ca.crt", "servername": "eventproc", "metrics": true }
//! ]
//! ```

use crate::error::{ApiServiceError, ApiServiceResult};
use core_config::{ClientCfg, ClientTlsCfg};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub id: String,
    pub api: String,
    pub endpoint: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub log: bool,
    #[serde(default)]
    pub metrics: bool,
    #[serde(default)]
    pub cacert: String,
    #[serde(default)]
    pub clientcert: String,
    #[serde(default)]
    pub clientkey: String,
    #[serde(default)]
    pub servercert: String,
    #[serde(default)]
    pub servername: String,
    #[serde(default)]
    pub systemca: bool,
    /// Builder specific options
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub opts: Map<String, Value>,
}

impl ServiceDef {
    /// Makes relative certificate paths relative to `certs_dir`.
    pub fn resolve_certs(&mut self, certs_dir: &Path) {
        for path in [
            &mut self.cacert,
            &mut self.clientcert,
            &mut self.clientkey,
            &mut self.servercert,
        ] {
            if !path.is_empty() && Path::new(path.as_str()).is_relative() {
                *path = certs_dir.join(path.as_str()).display().to_string();
            }
        }
    }

    /// Client settings to reach the service endpoint.
    pub fn client_cfg(&self) -> ClientCfg {
        ClientCfg {
            remote_uri: self.endpoint.clone(),
            tls: ClientTlsCfg {
                cert_file: self.clientcert.clone(),
                key_file: self.clientkey.clone(),
                server_cert: self.servercert.clone(),
                server_name: self.servername.clone(),
                ca_cert: self.cacert.clone(),
                use_system_cas: self.systemca,
            },
            metrics: self.metrics,
        }
    }
}

/// Reads every definition in a JSON definitions file.
pub fn defs_from_file(path: impl AsRef<Path>) -> ApiServiceResult<Vec<ServiceDef>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ApiServiceError::ReadDefs {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ApiServiceError::ParseDefs {
        path: path.to_path_buf(),
        source,
    })
}
