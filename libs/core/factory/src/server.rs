//! gRPC server factory.
//!
//! Servers are shared per listen URI through a [`ServerRegistry`]: the first
//! caller for a URI binds the socket and builds the server, later callers get
//! that same binding back as [`Bound::Existing`]. The registry is held locked
//! while a missing binding is built, trading start-up concurrency for the
//! guarantee that a URI is never bound twice.

use crate::error::{FactoryError, FactoryResult};
use core_config::{Configurable, ListenUri, ServerCfg};
use grpc_kit::{GrpcServer, InterceptorChain, Listener, ServerBinding, ServerRegistry, server_tls_config};

/// Outcome of [`server`].
#[derive(Debug, Clone)]
pub enum Bound {
    /// This call bound the socket and built the server
    New(ServerBinding),
    /// Another caller already serves the URI. Its TLS and interceptors are
    /// the ones it was built with, not necessarily the requested ones.
    Existing(ServerBinding),
}

impl Bound {
    pub fn already_bound(&self) -> bool {
        matches!(self, Bound::Existing(_))
    }

    pub fn binding(&self) -> &ServerBinding {
        match self {
            Bound::New(binding) | Bound::Existing(binding) => binding,
        }
    }

    pub fn into_binding(self) -> ServerBinding {
        match self {
            Bound::New(binding) | Bound::Existing(binding) => binding,
        }
    }

    /// The binding when fresh, [`FactoryError::AlreadyBound`] otherwise.
    pub fn into_result(self) -> FactoryResult<ServerBinding> {
        match self {
            Bound::New(binding) => Ok(binding),
            Bound::Existing(binding) => Err(FactoryError::AlreadyBound {
                uri: binding.listener.uri().to_string(),
            }),
        }
    }
}

/// Returns the server for `cfg.listen_uri`, creating it on first request.
pub fn server(cfg: &ServerCfg, registry: &ServerRegistry) -> FactoryResult<Bound> {
    cfg.validate()
        .map_err(|e| FactoryError::config("server", e))?;
    let uri = cfg.listen().map_err(|e| FactoryError::config("server", e))?;
    let key = uri.to_string();

    let (binding, existed) =
        registry.acquire_or_try_insert_with(&key, || build_binding(cfg, &uri))?;

    if existed {
        tracing::debug!(uri = %key, "server already exists, sharing it");
        Ok(Bound::Existing(binding))
    } else {
        tracing::debug!(
            uri = %key,
            local = %binding.listener.local_addr(),
            tls = binding.server.uses_tls(),
            "server created"
        );
        Ok(Bound::New(binding))
    }
}

fn build_binding(cfg: &ServerCfg, uri: &ListenUri) -> FactoryResult<ServerBinding> {
    let tls = if cfg.tls.use_tls() {
        Some(server_tls_config(&cfg.tls).map_err(|e| FactoryError::grpc("initializing TLS", e))?)
    } else {
        None
    };
    let filter = cfg
        .ip_filter()
        .map_err(|e| FactoryError::config("server", e))?;
    if cfg.metrics {
        observability::init_metrics()
            .map_err(|e| FactoryError::build("installing metrics recorder", e))?;
    }

    let listener = Listener::bind(uri).map_err(|e| FactoryError::grpc("listening server", e))?;
    // on error the listener is dropped here and its socket closed
    let server = GrpcServer::new(InterceptorChain::standard(filter, cfg.metrics), tls)
        .map_err(|e| FactoryError::grpc("building server", e))?;

    Ok(ServerBinding::new(listener, server))
}
