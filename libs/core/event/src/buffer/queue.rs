use crate::{Event, NotifyBuffer, NotifyError, NotifyResult};
use async_trait::async_trait;
use observability::NotifyMetrics;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::instrument::WithSubscriber;

/// Bounded queue drained by a background task into the next stage.
///
/// `push` never waits: when the queue is full the event is dropped with
/// [`NotifyError::QueueFull`]. The task ends once the queue is dropped and
/// drained.
pub struct Queue {
    tx: mpsc::Sender<Event>,
    service: String,
}

impl Queue {
    /// Must be called within a tokio runtime.
    pub fn new(next: Arc<dyn NotifyBuffer>, size: usize, service: impl Into<String>) -> Self {
        let service = service.into();
        let (tx, mut rx) = mpsc::channel::<Event>(size.max(1));

        let task_service = service.clone();
        let drain = async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = next.push(event).await {
                    tracing::debug!(service = %task_service, error = %e, "queued event lost");
                }
            }
            tracing::debug!(service = %task_service, "event queue closed");
        };
        tokio::spawn(drain.with_current_subscriber());

        Self { tx, service }
    }
}

#[async_trait]
impl NotifyBuffer for Queue {
    async fn push(&self, event: Event) -> NotifyResult<()> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                NotifyMetrics::record_queue_full(&self.service);
                NotifyError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
        })
    }
}
