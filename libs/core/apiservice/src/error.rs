use std::path::PathBuf;
use thiserror::Error;

pub type ApiServiceResult<T> = Result<T, ApiServiceError>;

#[derive(Error, Debug)]
pub enum ApiServiceError {
    #[error("reading '{}': {source}", path.display())]
    ReadDefs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing '{}': {source}", path.display())]
    ParseDefs {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("service id '{0}' is already registered")]
    DuplicateId(String),

    #[error("service '{id}': no builder for api '{api}'")]
    UnknownApi { id: String, api: String },

    #[error("building '{id}': {reason}")]
    Build { id: String, reason: String },
}

impl ApiServiceError {
    /// Wraps any builder failure, naming the service being built.
    pub fn build(id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Build {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
