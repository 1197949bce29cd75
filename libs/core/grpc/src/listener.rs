//! Socket binding for listen URIs.
//!
//! Binding is synchronous: the socket is bound and listening when
//! [`Listener::bind`] returns, and is converted to a tokio listener only when a
//! server starts serving it.

use crate::error::{GrpcError, GrpcResult};
use core_config::ListenUri;
use parking_lot::Mutex;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// The OS socket behind a [`Listener`].
#[derive(Debug)]
pub enum BoundSocket {
  Tcp(std::net::TcpListener),
  #[cfg(unix)]
  Unix(std::os::unix::net::UnixListener),
}

/// Address the socket actually bound to (port 0 resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAddr {
  Tcp(SocketAddr),
  Unix(PathBuf),
}

impl fmt::Display for LocalAddr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LocalAddr::Tcp(addr) => write!(f, "tcp://{addr}"),
      LocalAddr::Unix(path) => write!(f, "unix://{}", path.display()),
    }
  }
}

struct ListenerInner {
  uri: ListenUri,
  local_addr: LocalAddr,
  socket: Mutex<Option<BoundSocket>>,
}

impl Drop for ListenerInner {
  fn drop(&mut self) {
    if let LocalAddr::Unix(path) = &self.local_addr {
      let _ = std::fs::remove_file(path);
    }
  }
}

/// A bound socket shared by every holder of the same server binding.
///
/// Cloning is cheap; clones refer to the same socket. The socket itself can be
/// taken exactly once, by whoever serves it.
#[derive(Clone)]
pub struct Listener {
  inner: Arc<ListenerInner>,
}

impl Listener {
  /// Binds `uri` and starts listening.
  pub fn bind(uri: &ListenUri) -> GrpcResult<Self> {
    let listen_err = |source| GrpcError::Listen {
      uri: uri.to_string(),
      source,
    };
    let (socket, local_addr) = match uri {
      ListenUri::Tcp(addr) => {
        let socket = std::net::TcpListener::bind(addr.as_str()).map_err(listen_err)?;
        socket.set_nonblocking(true).map_err(listen_err)?;
        let local = socket.local_addr().map_err(listen_err)?;
        (BoundSocket::Tcp(socket), LocalAddr::Tcp(local))
      }
      #[cfg(unix)]
      ListenUri::Unix(path) => {
        let socket = std::os::unix::net::UnixListener::bind(path).map_err(listen_err)?;
        socket.set_nonblocking(true).map_err(listen_err)?;
        (BoundSocket::Unix(socket), LocalAddr::Unix(path.clone()))
      }
      #[cfg(not(unix))]
      ListenUri::Unix(_) => {
        return Err(listen_err(std::io::Error::from(
          std::io::ErrorKind::Unsupported,
        )));
      }
    };

    tracing::debug!(uri = %uri, local = %local_addr, "socket bound");

    Ok(Self {
      inner: Arc::new(ListenerInner {
        uri: uri.clone(),
        local_addr,
        socket: Mutex::new(Some(socket)),
      }),
    })
  }

  pub fn uri(&self) -> &ListenUri {
    &self.inner.uri
  }

  pub fn local_addr(&self) -> &LocalAddr {
    &self.inner.local_addr
  }

  /// True until the socket has been taken for serving.
  pub fn is_available(&self) -> bool {
    self.inner.socket.lock().is_some()
  }

  /// Hands the socket over to a serving task.
  pub fn take(&self) -> GrpcResult<BoundSocket> {
    self
      .inner
      .socket
      .lock()
      .take()
      .ok_or_else(|| GrpcError::ListenerTaken(self.inner.uri.to_string()))
  }

  /// True when both handles refer to the same bound socket.
  pub fn same_socket(&self, other: &Listener) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Listener {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Listener")
      .field("uri", &self.inner.uri)
      .field("local_addr", &self.inner.local_addr)
      .field("available", &self.is_available())
      .finish()
  }
}
