//! Metrics for health endpoints.

use metrics::{counter, histogram};
use std::time::Duration;

/// Health endpoint metrics recorder
pub struct HealthMetrics;

impl HealthMetrics {
    /// Record one ping of the health target and how long it took
    pub fn record_check(healthy: bool, elapsed: Duration) {
        let status = if healthy { "healthy" } else { "unhealthy" };
        counter!("health_checks_total", "status" => status).increment(1);
        histogram!("health_check_duration_seconds").record(elapsed.as_secs_f64());
    }

    /// Record a request refused by the peer allow-list
    pub fn record_denied(route: &str) {
        counter!("health_requests_denied_total", "route" => route.to_string()).increment(1);

        tracing::debug!(route = route, "Health request denied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{init_metrics, metrics_handler};

    #[tokio::test]
    async fn test_checks_are_rendered() {
        init_metrics().unwrap();
        HealthMetrics::record_check(false, Duration::from_millis(3));
        HealthMetrics::record_denied("/health");

        let body = metrics_handler().await;
        assert!(body.contains("health_checks_total{status=\"unhealthy\"}"));
        assert!(body.contains("health_check_duration_seconds"));
        assert!(body.contains("health_requests_denied_total{route=\"/health\"}"));
    }
}
