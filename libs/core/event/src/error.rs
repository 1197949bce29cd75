//! Error types for event notification.

use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The notifier could not deliver the event
    #[error("notify failed: {0}")]
    Delivery(String),

    /// The queue stage is at capacity; the event was dropped
    #[error("event queue is full")]
    QueueFull,

    /// The stage's background task has stopped
    #[error("event buffer is closed")]
    Closed,
}

impl NotifyError {
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}
