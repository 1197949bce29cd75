use core_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while binding sockets, loading credentials or serving.
#[derive(Error, Debug)]
pub enum GrpcError {
  /// The URI or TLS settings were rejected before any I/O
  #[error(transparent)]
  InvalidConfig(#[from] ConfigError),

  /// Socket could not be bound
  #[error("cannot listen socket '{uri}': {source}")]
  Listen {
    uri: String,
    #[source]
    source: std::io::Error,
  },

  /// Certificate or key file could not be read
  #[error("reading '{}': {source}", path.display())]
  ReadCredentials {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// tonic refused the credentials or endpoint
  #[error("transport: {0}")]
  Transport(#[from] tonic::transport::Error),

  /// The listener was already handed to a serving task
  #[error("listener for '{0}' is already in use")]
  ListenerTaken(String),
}

// Implement conversion to tonic::Status for use in interceptors
impl From<GrpcError> for tonic::Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidConfig(_) => tonic::Status::invalid_argument(err.to_string()),
      GrpcError::Listen { .. }
      | GrpcError::ReadCredentials { .. }
      | GrpcError::Transport(_)
      | GrpcError::ListenerTaken(_) => tonic::Status::unavailable(err.to_string()),
    }
  }
}
