use super::metrics::ServerCallMetrics;
use super::peer_filter::check_peer;
use core_config::IpFilter;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// One stage of the server middleware chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerInterceptor {
  /// Reject calls from peers outside the allow-list
  PeerFilter(IpFilter),
  /// Count calls and time them per method
  Metrics,
}

/// Ordered server middleware, applied to every call on a server.
///
/// Stages run in insertion order; a rejecting stage short-circuits the rest,
/// so calls refused by the peer filter never reach the metrics stage.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
  stages: Arc<Vec<ServerInterceptor>>,
}

impl InterceptorChain {
  pub fn new(stages: Vec<ServerInterceptor>) -> Self {
    Self {
      stages: Arc::new(stages),
    }
  }

  /// Peer filter when the allow-list is non-empty, then metrics when enabled.
  pub fn standard(filter: IpFilter, metrics: bool) -> Self {
    let mut stages = Vec::with_capacity(2);
    if !filter.is_empty() {
      stages.push(ServerInterceptor::PeerFilter(filter));
    }
    if metrics {
      stages.push(ServerInterceptor::Metrics);
    }
    Self::new(stages)
  }

  pub fn stages(&self) -> &[ServerInterceptor] {
    &self.stages
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn has_peer_filter(&self) -> bool {
    self
      .stages
      .iter()
      .any(|s| matches!(s, ServerInterceptor::PeerFilter(_)))
  }

  pub fn has_metrics(&self) -> bool {
    self.stages.contains(&ServerInterceptor::Metrics)
  }
}

impl<S> Layer<S> for InterceptorChain {
  type Service = InterceptedServer<S>;

  fn layer(&self, inner: S) -> Self::Service {
    InterceptedServer {
      inner,
      chain: self.clone(),
    }
  }
}

/// Service produced by [`InterceptorChain`].
#[derive(Debug, Clone)]
pub struct InterceptedServer<S> {
  inner: S,
  chain: InterceptorChain,
}

impl<S, B> Service<http::Request<B>> for InterceptedServer<S>
where
  S: Service<http::Request<B>, Response = http::Response<tonic::body::Body>>
    + Clone
    + Send
    + 'static,
  S::Future: Send + 'static,
  B: Send + 'static,
{
  type Response = S::Response;
  type Error = S::Error;
  type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

  fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
    self.inner.poll_ready(cx)
  }

  fn call(&mut self, req: http::Request<B>) -> Self::Future {
    let mut call_metrics = None;
    for stage in self.chain.stages() {
      match stage {
        ServerInterceptor::PeerFilter(filter) => {
          if let Err(status) = check_peer(filter, req.extensions()) {
            return Box::pin(async move { Ok(status.into_http()) });
          }
        }
        ServerInterceptor::Metrics => {
          call_metrics = Some(ServerCallMetrics::start(req.uri().path()));
        }
      }
    }

    // the clone is not guaranteed ready, keep the one poll_ready drove
    let clone = self.inner.clone();
    let mut inner = std::mem::replace(&mut self.inner, clone);
    Box::pin(async move {
      let response = inner.call(req).await;
      if let Some(call_metrics) = call_metrics {
        call_metrics.finish();
      }
      response
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::interceptors::metrics::SERVER_STARTED_TOTAL;
  use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
  use std::convert::Infallible;
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
  use tonic::transport::server::TcpConnectInfo;
  use tower::ServiceExt;

  /// Counts how many calls the metrics stage started.
  #[derive(Default)]
  struct StartedCalls(AtomicUsize);

  impl Recorder for StartedCalls {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
      if key.name() == SERVER_STARTED_TOTAL {
        self.0.fetch_add(1, Ordering::SeqCst);
      }
      Counter::noop()
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
      Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
      Histogram::noop()
    }
  }

  fn request_from(peer: &str) -> http::Request<()> {
    let mut req = http::Request::builder()
      .uri("/xlist.Check/Check")
      .body(())
      .unwrap();
    req.extensions_mut().insert(TcpConnectInfo {
      local_addr: None,
      remote_addr: Some(peer.parse().unwrap()),
    });
    req
  }

  /// Sends `req` through the standard filtered and metered chain. Returns the
  /// response, whether the wrapped service ran and how many calls were counted.
  async fn call_filtered(req: http::Request<()>) -> (http::Response<tonic::body::Body>, bool, usize) {
    let reached = Arc::new(AtomicBool::new(false));
    let seen = reached.clone();
    let chain = InterceptorChain::standard(IpFilter::allow_list(["10.0.0.0/8"]).unwrap(), true);
    let mut svc = chain.layer(tower::service_fn(move |_req: http::Request<()>| {
      seen.store(true, Ordering::SeqCst);
      async { Ok::<_, Infallible>(http::Response::new(tonic::body::Body::default())) }
    }));

    let recorder = StartedCalls::default();
    let future = metrics::with_local_recorder(&recorder, || svc.call(req));
    let response = future.await.unwrap();
    (
      response,
      reached.load(Ordering::SeqCst),
      recorder.0.load(Ordering::SeqCst),
    )
  }

  #[test]
  fn test_standard_chain_order() {
    let filter = IpFilter::allow_list(["10.0.0.0/8"]).unwrap();
    let chain = InterceptorChain::standard(filter.clone(), true);
    assert_eq!(
      chain.stages(),
      &[ServerInterceptor::PeerFilter(filter), ServerInterceptor::Metrics]
    );
    assert!(chain.has_peer_filter());
    assert!(chain.has_metrics());
  }

  #[test]
  fn test_standard_chain_skips_empty_filter() {
    let chain = InterceptorChain::standard(IpFilter::default(), false);
    assert!(chain.is_empty());
    assert!(!chain.has_peer_filter());
  }

  #[tokio::test]
  async fn test_passes_calls_through() {
    let chain = InterceptorChain::standard(IpFilter::allow_list(["10.0.0.0/8"]).unwrap(), true);
    let svc = chain.layer(tower::service_fn(|_req: http::Request<()>| async {
      Ok::<_, Infallible>(http::Response::new(tonic::body::Body::default()))
    }));
    let req = http::Request::builder()
      .uri("/xlist.Check/Check")
      .body(())
      .unwrap();
    let response = svc.oneshot(req).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);
  }

  #[tokio::test]
  async fn test_rejected_call_skips_metrics() {
    let (response, reached, started) = call_filtered(request_from("8.8.8.8:40000")).await;
    // gRPC errors travel as a 200 with the code in the grpc-status header
    assert_eq!(response.headers().get("grpc-status").unwrap(), "7");
    assert!(!reached);
    assert_eq!(started, 0);
  }

  #[tokio::test]
  async fn test_allowed_call_is_counted() {
    let (response, reached, started) = call_filtered(request_from("10.1.1.1:40000")).await;
    assert!(response.headers().get("grpc-status").is_none());
    assert!(reached);
    assert_eq!(started, 1);
  }
}
