//! Observability utilities shared by gRPC and health servers.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Metric descriptions for gRPC calls and event notifications
//! - Recorders for health checks and event notifications
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler};
//!
//! init_metrics()?;
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod health;
pub mod notify;

pub use health::HealthMetrics;
pub use notify::NotifyMetrics;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("failed to install Prometheus recorder: {0}")]
    Recorder(#[from] BuildError),
}

/// Initialize the Prometheus metrics recorder.
///
/// Safe to call repeatedly: the recorder is installed by the first call and
/// later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, ObservabilityError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_histogram;

    // Health metrics
    describe_counter!(
        "health_checks_total",
        "Pings of the health target by status"
    );
    describe_histogram!(
        "health_check_duration_seconds",
        "Time taken by the health target to answer a ping"
    );
    describe_counter!(
        "health_requests_denied_total",
        "Health requests refused by the peer allow-list"
    );

    // gRPC metrics
    describe_counter!(
        "grpc_server_started_total",
        "Total number of RPCs started on the server"
    );
    describe_histogram!(
        "grpc_server_handling_seconds",
        "Time until the server produced the response head"
    );
    describe_counter!(
        "grpc_client_started_total",
        "Total number of RPCs started by clients"
    );

    // Event notification metrics
    describe_counter!(
        "event_notify_total",
        "Events handed to notifiers by status"
    );
    describe_counter!(
        "event_notify_dropped_total",
        "Events dropped before notification by reason"
    );
}
