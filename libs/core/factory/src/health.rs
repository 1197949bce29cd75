use crate::error::{FactoryError, FactoryResult};
use core_config::{Configurable, HealthCfg};
use grpc_kit::Listener;
use health_server::{HealthOptions, HealthServer, Pingable};
use std::sync::Arc;

/// A bound health socket and the server that will serve it.
#[derive(Debug, Clone)]
pub struct HealthBinding {
    pub listener: Listener,
    pub server: HealthServer,
}

/// Health server for `target`, or `None` when `cfg` is empty.
///
/// `dispatch` receives the server's own events instead of the global
/// subscriber when given.
pub fn health(
    cfg: &HealthCfg,
    target: Arc<dyn Pingable>,
    dispatch: Option<tracing::Dispatch>,
) -> FactoryResult<Option<HealthBinding>> {
    if cfg.is_empty() {
        return Ok(None);
    }
    cfg.validate()
        .map_err(|e| FactoryError::config("health", e))?;
    let uri = cfg.listen().map_err(|e| FactoryError::config("health", e))?;
    let options = HealthOptions {
        metrics: cfg.metrics,
        profile: cfg.profile,
        ip_filter: cfg.ip_filter().map_err(|e| FactoryError::config("health", e))?,
        dispatch,
    };

    let server =
        HealthServer::new(target, options).map_err(|e| FactoryError::build("building health", e))?;
    let listener = Listener::bind(&uri).map_err(|e| FactoryError::grpc("listening health", e))?;

    tracing::debug!(local = %listener.local_addr(), "health server created");
    Ok(Some(HealthBinding { listener, server }))
}
