//! Metrics for event notification pipelines.

use metrics::counter;

/// Event notification metrics recorder
pub struct NotifyMetrics;

impl NotifyMetrics {
    /// Record an event handed to the backing notifier
    pub fn record_sent(service: &str) {
        counter!(
            "event_notify_total",
            "service" => service.to_string(),
            "status" => "sent"
        )
        .increment(1);
    }

    /// Record an event the notifier refused
    pub fn record_failed(service: &str) {
        counter!(
            "event_notify_total",
            "service" => service.to_string(),
            "status" => "failed"
        )
        .increment(1);

        tracing::debug!(service = service, "Event notification failed");
    }

    /// Record an event dropped as a duplicate inside the wait window
    pub fn record_duplicate(service: &str) {
        counter!(
            "event_notify_dropped_total",
            "service" => service.to_string(),
            "reason" => "duplicate"
        )
        .increment(1);
    }

    /// Record an event dropped because the queue was full
    pub fn record_queue_full(service: &str) {
        counter!(
            "event_notify_dropped_total",
            "service" => service.to_string(),
            "reason" => "queue_full"
        )
        .increment(1);

        tracing::warn!(service = service, "Event queue full, event dropped");
    }
}
