//! HTTP health server for gRPC services.
//!
//! Serves `/health` by pinging a [`Pingable`] target, plus `/metrics` and
//! `/debug/runtime` when enabled in [`HealthOptions`]. Peers outside the
//! configured allow-list get `403`.

pub mod filter;
pub mod routes;
mod server;

pub use filter::ip_filter_middleware;
pub use routes::{HealthResponse, Pingable};
pub use server::{HealthOptions, HealthServer};

use thiserror::Error;

pub type HealthResult<T> = Result<T, HealthError>;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error(transparent)]
    Metrics(#[from] observability::ObservabilityError),

    #[error(transparent)]
    Listener(#[from] grpc_kit::GrpcError),

    #[error("health server on '{local}' failed: {source}")]
    Serve {
        local: String,
        #[source]
        source: std::io::Error,
    },
}
