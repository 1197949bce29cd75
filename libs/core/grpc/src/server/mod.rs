//! gRPC server sharing one listener per listen URI.
//!
//! A [`GrpcServer`] carries the transport settings and the interceptor chain
//! decided when it was built. Services may be registered on it by several
//! components before it is served on its [`Listener`].
//!
//! ```ignore
//! use grpc_kit::{GrpcServer, InterceptorChain, Listener};
//!
//! let listener = Listener::bind(&cfg.listen()?)?;
//! let server = GrpcServer::new(InterceptorChain::standard(cfg.ip_filter()?, cfg.metrics), None)?;
//! server.add_services(|routes| {
//!   routes.add_service(XListServer::new(my_impl));
//! });
//! server.serve(&listener).await?;
//! ```

use crate::error::{GrpcError, GrpcResult};
use crate::interceptors::InterceptorChain;
use crate::listener::{BoundSocket, Listener};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use tonic::service::RoutesBuilder;
use tonic::transport::{Server, ServerTlsConfig};
use tower::layer::util::{Identity, Stack};

type LayeredServer = Server<Stack<InterceptorChain, Identity>>;

pub struct GrpcServer {
  builder: LayeredServer,
  routes: Mutex<RoutesBuilder>,
  chain: InterceptorChain,
  tls: bool,
}

impl GrpcServer {
  /// Builds a server applying `chain` to every call, with TLS when given.
  pub fn new(chain: InterceptorChain, tls: Option<ServerTlsConfig>) -> GrpcResult<Self> {
    let uses_tls = tls.is_some();
    let mut builder = Server::builder();
    if let Some(tls) = tls {
      builder = builder.tls_config(tls)?;
    }
    Ok(Self {
      builder: builder.layer(chain.clone()),
      routes: Mutex::new(RoutesBuilder::default()),
      chain,
      tls: uses_tls,
    })
  }

  /// Registers services to be exposed once the server is served.
  pub fn add_services(&self, register: impl FnOnce(&mut RoutesBuilder)) {
    register(&mut self.routes.lock());
  }

  /// Interceptors applied to every call, in order.
  pub fn interceptors(&self) -> &InterceptorChain {
    &self.chain
  }

  pub fn uses_tls(&self) -> bool {
    self.tls
  }

  /// Serves registered services on `listener` until the task is dropped.
  pub async fn serve(&self, listener: &Listener) -> GrpcResult<()> {
    self
      .serve_with_shutdown(listener, futures::future::pending())
      .await
  }

  /// Serves registered services on `listener` until `signal` completes.
  ///
  /// The listener's socket is consumed: a binding can be served once.
  pub async fn serve_with_shutdown<F>(&self, listener: &Listener, signal: F) -> GrpcResult<()>
  where
    F: Future<Output = ()> + Send,
  {
    let socket = listener.take()?;
    let routes = std::mem::take(&mut *self.routes.lock()).routes();
    let mut builder = self.builder.clone();
    let router = builder.add_routes(routes);
    let listen_err = |source| GrpcError::Listen {
      uri: listener.uri().to_string(),
      source,
    };

    tracing::info!(
      local = %listener.local_addr(),
      tls = self.tls,
      interceptors = ?self.chain.stages(),
      "gRPC server starting"
    );

    match socket {
      BoundSocket::Tcp(socket) => {
        let socket = tokio::net::TcpListener::from_std(socket).map_err(listen_err)?;
        let incoming = tokio_stream::wrappers::TcpListenerStream::new(socket);
        router.serve_with_incoming_shutdown(incoming, signal).await?;
      }
      #[cfg(unix)]
      BoundSocket::Unix(socket) => {
        let socket = tokio::net::UnixListener::from_std(socket).map_err(listen_err)?;
        let incoming = tokio_stream::wrappers::UnixListenerStream::new(socket);
        router.serve_with_incoming_shutdown(incoming, signal).await?;
      }
    }

    tracing::info!(local = %listener.local_addr(), "gRPC server stopped");
    Ok(())
  }
}

impl fmt::Debug for GrpcServer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GrpcServer")
      .field("interceptors", &self.chain)
      .field("tls", &self.tls)
      .finish_non_exhaustive()
  }
}
