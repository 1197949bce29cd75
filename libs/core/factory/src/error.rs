use core_config::ConfigError;
use grpc_kit::GrpcError;
use std::error::Error as StdError;
use thiserror::Error;

pub type FactoryResult<T> = Result<T, FactoryError>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Why a factory produced nothing.
///
/// `AlreadyBound` is not a failure: the server factory reports it when the
/// caller asked for a listen URI somebody else already serves.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// A config value is malformed
    #[error("invalid {config} config: {source}")]
    InvalidConfig {
        config: &'static str,
        #[source]
        source: ConfigError,
    },

    /// A file, directory or socket the config points at is not usable
    #[error("{stage}: {source}")]
    ResourceUnavailable {
        stage: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("server for uri '{uri}' already exists")]
    AlreadyBound { uri: String },

    #[error("can't find service '{id}'")]
    ServiceNotFound { id: String },

    #[error("service '{id}' is not a {capability}")]
    WrongCapability { id: String, capability: &'static str },

    /// Construction failed after the config was accepted
    #[error("{stage}: {source}")]
    Build {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
}

impl FactoryError {
    /// Validation failure of `config`; missing files and directories are
    /// reported as unavailable resources.
    pub(crate) fn config(config: &'static str, source: ConfigError) -> Self {
        if source.is_missing_resource() {
            Self::ResourceUnavailable {
                stage: config,
                source: Box::new(source),
            }
        } else {
            Self::InvalidConfig { config, source }
        }
    }

    pub(crate) fn build(stage: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Build {
            stage,
            source: source.into(),
        }
    }

    /// Socket and credential failures are unavailable resources, the rest
    /// construction failures.
    pub(crate) fn grpc(stage: &'static str, source: GrpcError) -> Self {
        match source {
            GrpcError::InvalidConfig(source) if source.is_missing_resource() => {
                Self::ResourceUnavailable {
                    stage,
                    source: Box::new(source),
                }
            }
            GrpcError::Listen { .. } | GrpcError::ReadCredentials { .. } => {
                Self::ResourceUnavailable {
                    stage,
                    source: Box::new(source),
                }
            }
            other => Self::build(stage, other),
        }
    }

    pub fn is_already_bound(&self) -> bool {
        matches!(self, Self::AlreadyBound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_classification() {
        let err = FactoryError::config(
            "apiservices",
            ConfigError::NotFound {
                what: "directory",
                path: PathBuf::from("/nope"),
            },
        );
        assert!(matches!(err, FactoryError::ResourceUnavailable { stage: "apiservices", .. }));

        let err = FactoryError::config("logger", ConfigError::Required("level"));
        assert!(matches!(err, FactoryError::InvalidConfig { config: "logger", .. }));
        assert_eq!(err.to_string(), "invalid logger config: level is required");
    }

    #[test]
    fn test_grpc_error_classification() {
        let err = FactoryError::grpc(
            "listening server",
            GrpcError::Listen {
                uri: "tcp://127.0.0.1:1".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
            },
        );
        assert!(matches!(err, FactoryError::ResourceUnavailable { .. }));
        assert!(err.to_string().starts_with("listening server: "));

        let err = FactoryError::grpc("serving", GrpcError::ListenerTaken("tcp://x".into()));
        assert!(matches!(err, FactoryError::Build { .. }));
    }

    #[test]
    fn test_already_bound_is_distinguishable() {
        let err = FactoryError::AlreadyBound {
            uri: "tcp://127.0.0.1:5801".to_string(),
        };
        assert!(err.is_already_bound());
        assert!(err.to_string().contains("tcp://127.0.0.1:5801"));
    }
}
