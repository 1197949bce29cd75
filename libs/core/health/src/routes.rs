use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use observability::HealthMetrics;
use std::sync::Arc;
use std::time::Instant;

/// Anything whose liveness can be checked by the health endpoint.
#[async_trait]
pub trait Pingable: Send + Sync {
    async fn ping(&self) -> Result<(), String>;
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RuntimeResponse {
    pub workers: usize,
    pub alive_tasks: usize,
    pub global_queue_depth: usize,
}

/// Health check endpoint handler.
///
/// Returns 200 while the target answers its ping, 503 otherwise.
pub async fn health_handler(State(target): State<Arc<dyn Pingable>>) -> Response {
    let start = Instant::now();
    let result = target.ping().await;
    HealthMetrics::record_check(result.is_ok(), start.elapsed());

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    error: Some(e),
                }),
            )
                .into_response()
        }
    }
}

/// Tokio runtime counters for the profiling route.
pub async fn runtime_handler() -> Json<RuntimeResponse> {
    let metrics = tokio::runtime::Handle::current().metrics();
    Json(RuntimeResponse {
        workers: metrics.num_workers(),
        alive_tasks: metrics.num_alive_tasks(),
        global_queue_depth: metrics.global_queue_depth(),
    })
}

/// Creates the health router.
///
/// `/metrics` is mounted only with `metrics`, `/debug/runtime` only with
/// `profile`. Pings are counted whether or not `/metrics` is mounted.
pub fn health_router(target: Arc<dyn Pingable>, metrics: bool, profile: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .with_state(target);

    if metrics {
        router = router.route("/metrics", get(observability::metrics_handler));
    }
    if profile {
        router = router.route("/debug/runtime", get(runtime_handler));
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Fixed(Result<(), String>);

    #[async_trait]
    impl Pingable for Fixed {
        async fn ping(&self) -> Result<(), String> {
            self.0.clone()
        }
    }

    async fn status_of(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let router = health_router(Arc::new(Fixed(Ok(()))), false, false);
        assert_eq!(status_of(router, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_unavailable() {
        let router = health_router(Arc::new(Fixed(Err("db down".into()))), false, false);
        assert_eq!(
            status_of(router, "/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_optional_routes() {
        let target: Arc<dyn Pingable> = Arc::new(Fixed(Ok(())));
        let plain = health_router(target.clone(), false, false);
        assert_eq!(status_of(plain.clone(), "/metrics").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(plain, "/debug/runtime").await, StatusCode::NOT_FOUND);

        let full = health_router(target, true, true);
        assert_eq!(status_of(full.clone(), "/metrics").await, StatusCode::OK);
        assert_eq!(status_of(full, "/debug/runtime").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_ping_is_counted() {
        observability::init_metrics().unwrap();
        let router = health_router(Arc::new(Fixed(Err("db down".into()))), true, false);
        status_of(router, "/health").await;

        let body = observability::metrics_handler().await;
        assert!(body.contains("health_checks_total{status=\"unhealthy\"}"));
    }
}
