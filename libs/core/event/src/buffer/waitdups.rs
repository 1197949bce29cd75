use crate::{Event, NotifyBuffer, NotifyError, NotifyResult};
use async_trait::async_trait;
use observability::NotifyMetrics;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::instrument::WithSubscriber;

/// Holds events for one `wait` window and forwards only the first of each
/// set of identical events (same [`Event::dedup_key`]) raised in it.
///
/// At most `size` distinct events are held: reaching it closes the window
/// early.
pub struct WaitDups {
    tx: mpsc::Sender<Event>,
}

impl WaitDups {
    /// Must be called within a tokio runtime.
    pub fn new(
        next: Arc<dyn NotifyBuffer>,
        size: usize,
        wait: Duration,
        service: impl Into<String>,
    ) -> Self {
        let service = service.into();
        let size = size.max(1);
        let (tx, rx) = mpsc::channel::<Event>(size);
        // interval panics on a zero period
        let wait = wait.max(Duration::from_millis(1));
        tokio::spawn(run(rx, next, size, wait, service).with_current_subscriber());
        Self { tx }
    }
}

async fn run(
    mut rx: mpsc::Receiver<Event>,
    next: Arc<dyn NotifyBuffer>,
    size: usize,
    wait: Duration,
    service: String,
) {
    let mut pending: Vec<Event> = Vec::with_capacity(size);
    let mut seen: HashSet<String> = HashSet::new();
    let mut ticker = tokio::time::interval(wait);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(event) => {
                    if seen.insert(event.dedup_key()) {
                        pending.push(event);
                        if pending.len() >= size {
                            tracing::trace!(service = %service, size, "wait-dups window full");
                            flush(&next, &mut pending, &service).await;
                            seen.clear();
                            ticker.reset();
                        }
                    } else {
                        NotifyMetrics::record_duplicate(&service);
                        tracing::trace!(service = %service, event = %event.id, "duplicate event dropped");
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                flush(&next, &mut pending, &service).await;
                seen.clear();
            }
        }
    }

    flush(&next, &mut pending, &service).await;
    tracing::debug!(service = %service, "wait-dups stage closed");
}

async fn flush(next: &Arc<dyn NotifyBuffer>, pending: &mut Vec<Event>, service: &str) {
    for event in pending.drain(..) {
        if let Err(e) = next.push(event).await {
            tracing::debug!(service = %service, error = %e, "event lost after dedup");
        }
    }
}

#[async_trait]
impl NotifyBuffer for WaitDups {
    async fn push(&self, event: Event) -> NotifyResult<()> {
        self.tx.send(event).await.map_err(|_| NotifyError::Closed)
    }
}
