use crate::error::{FactoryError, FactoryResult};
use apiservice::Discover;
use core_config::{Configurable, EventNotifyCfg};
use event_notify::{Notifier, NotifierSink, NotifyBuffer, Queue, WaitDups};
use std::sync::Arc;

/// The notifier registered as `cfg.service`, or `None` when `cfg` is empty.
pub fn event_notify(
    cfg: &EventNotifyCfg,
    registry: &dyn Discover,
) -> FactoryResult<Option<Arc<dyn Notifier>>> {
    if cfg.is_empty() {
        return Ok(None);
    }
    cfg.validate()
        .map_err(|e| FactoryError::config("event notify", e))?;
    resolve_notifier(&cfg.service, registry).map(Some)
}

/// A buffered pipeline in front of the notifier registered as `cfg.service`,
/// or `None` when `cfg` is empty.
///
/// Stages, outermost first: a bounded queue when `buffer > 0`, a duplicate
/// collapsing window when `wait_dups > 0` too, and the notifier itself. Must
/// be called within a tokio runtime when any buffering stage is built.
pub fn event_notify_buffer(
    cfg: &EventNotifyCfg,
    registry: &dyn Discover,
) -> FactoryResult<Option<Arc<dyn NotifyBuffer>>> {
    if cfg.is_empty() {
        return Ok(None);
    }
    cfg.validate()
        .map_err(|e| FactoryError::config("event notify", e))?;
    let notifier = resolve_notifier(&cfg.service, registry)?;

    let mut output: Arc<dyn NotifyBuffer> = Arc::new(NotifierSink::new(notifier, &cfg.service));
    if cfg.wait_dups > 0 && cfg.buffer > 0 {
        output = Arc::new(WaitDups::new(output, cfg.buffer, cfg.wait_dups(), &cfg.service));
    }
    if cfg.buffer > 0 {
        output = Arc::new(Queue::new(output, cfg.buffer, &cfg.service));
    }

    tracing::debug!(
        service = %cfg.service,
        buffer = cfg.buffer,
        wait_dups_ms = cfg.wait_dups,
        "event notify buffer created"
    );
    Ok(Some(output))
}

fn resolve_notifier(id: &str, registry: &dyn Discover) -> FactoryResult<Arc<dyn Notifier>> {
    let service = registry
        .get_service(id)
        .ok_or_else(|| FactoryError::ServiceNotFound { id: id.to_string() })?;
    service.notifier().ok_or_else(|| FactoryError::WrongCapability {
        id: id.to_string(),
        capability: "notifier",
    })
}
