use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tonic::{Request, Status};

pub const SERVER_STARTED_TOTAL: &str = "grpc_server_started_total";
pub const SERVER_HANDLING_SECONDS: &str = "grpc_server_handling_seconds";
pub const CLIENT_STARTED_TOTAL: &str = "grpc_client_started_total";

/// Per-call server metrics: counted on start, timed until the response head.
pub(crate) struct ServerCallMetrics {
  method: String,
  start: Instant,
}

impl ServerCallMetrics {
  pub(crate) fn start(method: &str) -> Self {
    counter!(SERVER_STARTED_TOTAL, "grpc_method" => method.to_string()).increment(1);
    Self {
      method: method.to_string(),
      start: Instant::now(),
    }
  }

  pub(crate) fn finish(self) {
    histogram!(SERVER_HANDLING_SECONDS, "grpc_method" => self.method)
      .record(self.start.elapsed().as_secs_f64());
  }
}

/// Client interceptor counting outgoing calls.
///
/// Clones share the counter, so the value read from any handle covers every
/// client built from the same connection.
///
/// # Example
/// ```ignore
/// let conn = service_factory::client_conn(&cfg)?;
/// let client = XListClient::with_interceptor(conn.channel(), conn.interceptor());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientMetricsInterceptor {
  enabled: bool,
  total_requests: Arc<AtomicU64>,
}

impl ClientMetricsInterceptor {
  pub fn new(enabled: bool) -> Self {
    Self {
      enabled,
      total_requests: Arc::default(),
    }
  }

  /// A pass-through interceptor that records nothing.
  pub fn disabled() -> Self {
    Self::new(false)
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Get the total number of requests processed
  pub fn total_requests(&self) -> u64 {
    self.total_requests.load(Ordering::Relaxed)
  }
}

impl tonic::service::Interceptor for ClientMetricsInterceptor {
  fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
    if self.enabled {
      let count = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;
      counter!(CLIENT_STARTED_TOTAL).increment(1);
      tracing::trace!(target: "grpc_kit", count, "gRPC client request");
    }
    Ok(request)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tonic::service::Interceptor;

  #[test]
  fn test_metrics_counting_shared_between_clones() {
    let mut metrics = ClientMetricsInterceptor::new(true);
    let observer = metrics.clone();
    assert_eq!(observer.total_requests(), 0);

    let _ = metrics.call(Request::new(()));
    let _ = metrics.call(Request::new(()));
    assert_eq!(observer.total_requests(), 2);
  }

  #[test]
  fn test_disabled_passes_through() {
    let mut metrics = ClientMetricsInterceptor::disabled();
    assert!(metrics.call(Request::new(())).is_ok());
    assert_eq!(metrics.total_requests(), 0);
    assert!(!metrics.is_enabled());
  }

  #[test]
  fn test_server_call_metrics_without_recorder() {
    let call = ServerCallMetrics::start("/xlist.Check/Check");
    call.finish();
  }
}
