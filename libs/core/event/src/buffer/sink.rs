use crate::{Event, Notifier, NotifyBuffer, NotifyResult};
use async_trait::async_trait;
use observability::NotifyMetrics;
use std::sync::Arc;

/// Last stage: hands events to the notifier.
pub struct NotifierSink {
    notifier: Arc<dyn Notifier>,
    service: String,
}

impl NotifierSink {
    pub fn new(notifier: Arc<dyn Notifier>, service: impl Into<String>) -> Self {
        Self {
            notifier,
            service: service.into(),
        }
    }
}

#[async_trait]
impl NotifyBuffer for NotifierSink {
    async fn push(&self, event: Event) -> NotifyResult<()> {
        let id = event.id;
        match self.notifier.notify(event).await {
            Ok(()) => {
                NotifyMetrics::record_sent(&self.service);
                Ok(())
            }
            Err(e) => {
                NotifyMetrics::record_failed(&self.service);
                tracing::warn!(service = %self.service, event = %id, error = %e, "event not notified");
                Err(e)
            }
        }
    }
}
