use crate::error::NotifyResult;
use crate::event::Event;
use async_trait::async_trait;

/// Delivers events to a collector.
///
/// Implemented by API service clients that speak the notification protocol.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: Event) -> NotifyResult<()>;
}

/// Entry point of an event pipeline.
#[async_trait]
pub trait NotifyBuffer: Send + Sync {
    async fn push(&self, event: Event) -> NotifyResult<()>;
}
