use crate::filter::ip_filter_middleware;
use crate::routes::{Pingable, health_router};
use crate::{HealthError, HealthResult};
use axum::{Router, middleware};
use core_config::IpFilter;
use grpc_kit::{BoundSocket, Listener};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::instrument::WithSubscriber;

/// Recognized health server options.
#[derive(Debug, Clone, Default)]
pub struct HealthOptions {
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics: bool,
    /// Serve `/debug/runtime`
    pub profile: bool,
    /// Peers allowed to connect; empty allows everyone
    pub ip_filter: IpFilter,
    /// Subscriber receiving the server's own events, instead of the global one
    pub dispatch: Option<tracing::Dispatch>,
}

#[derive(Clone)]
pub struct HealthServer {
    router: Router,
    dispatch: Option<tracing::Dispatch>,
}

impl HealthServer {
    pub fn new(target: Arc<dyn Pingable>, options: HealthOptions) -> HealthResult<Self> {
        if options.metrics {
            observability::init_metrics()?;
        }

        let mut router = health_router(target, options.metrics, options.profile);
        if !options.ip_filter.is_empty() {
            router = router.layer(middleware::from_fn_with_state(
                options.ip_filter,
                ip_filter_middleware,
            ));
        }

        Ok(Self {
            router,
            dispatch: options.dispatch,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves health routes on `listener` until the task is dropped.
    pub async fn serve(&self, listener: &Listener) -> HealthResult<()> {
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serves health routes on `listener` until `signal` completes.
    pub async fn serve_with_shutdown<F>(&self, listener: &Listener, signal: F) -> HealthResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let serving = serve_socket(self.router(), listener, signal);
        match &self.dispatch {
            Some(dispatch) => serving.with_subscriber(dispatch.clone()).await,
            None => serving.await,
        }
    }
}

async fn serve_socket<F>(router: Router, listener: &Listener, signal: F) -> HealthResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let socket = listener.take()?;
    let local = listener.local_addr().to_string();
    let serve_err = |source| HealthError::Serve {
        local: local.clone(),
        source,
    };

    tracing::info!(local = %local, "health server starting");

    match socket {
        BoundSocket::Tcp(socket) => {
            let socket = tokio::net::TcpListener::from_std(socket).map_err(serve_err)?;
            axum::serve(
                socket,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(signal)
            .await
            .map_err(serve_err)?;
        }
        #[cfg(unix)]
        BoundSocket::Unix(socket) => {
            let socket = tokio::net::UnixListener::from_std(socket).map_err(serve_err)?;
            axum::serve(socket, router.into_make_service())
                .with_graceful_shutdown(signal)
                .await
                .map_err(serve_err)?;
        }
    }

    tracing::info!(local = %local, "health server stopped");
    Ok(())
}

impl std::fmt::Debug for HealthServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthServer")
            .field("dispatch", &self.dispatch.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_config::ListenUri;

    struct Alive;

    #[async_trait]
    impl Pingable for Alive {
        async fn ping(&self) -> Result<(), String> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let listener = Listener::bind(&ListenUri::parse("tcp://127.0.0.1:0").unwrap()).unwrap();
        let server = HealthServer::new(Arc::new(Alive), HealthOptions::default()).unwrap();
        server.serve_with_shutdown(&listener, async {}).await.unwrap();
        assert!(!listener.is_available());
    }

    #[tokio::test]
    async fn test_serve_with_dispatch() {
        let listener = Listener::bind(&ListenUri::parse("tcp://127.0.0.1:0").unwrap()).unwrap();
        let options = HealthOptions {
            dispatch: Some(tracing::Dispatch::none()),
            ..Default::default()
        };
        let server = HealthServer::new(Arc::new(Alive), options).unwrap();
        server.serve_with_shutdown(&listener, async {}).await.unwrap();
    }

    #[test]
    fn test_metrics_option_installs_recorder() {
        let options = HealthOptions {
            metrics: true,
            ..Default::default()
        };
        HealthServer::new(Arc::new(Alive), options).unwrap();
        assert!(observability::get_metrics_handle().is_some());
    }
}
