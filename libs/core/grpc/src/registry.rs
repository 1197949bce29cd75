//! Process-wide table of servers keyed by listen URI.
//!
//! Two components asking for a server on the same URI must end up sharing
//! one socket and one server, never racing to bind it twice. The registry
//! lock is held while a missing entry is built, so concurrent callers for the
//! same URI wait and then observe the finished binding.

use crate::listener::Listener;
use crate::server::GrpcServer;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A listener and the server that will serve it.
#[derive(Debug, Clone)]
pub struct ServerBinding {
  pub listener: Listener,
  pub server: Arc<GrpcServer>,
}

impl ServerBinding {
  pub fn new(listener: Listener, server: GrpcServer) -> Self {
    Self {
      listener,
      server: Arc::new(server),
    }
  }

  /// True when both bindings hold the same listener and server.
  pub fn same_binding(&self, other: &ServerBinding) -> bool {
    self.listener.same_socket(&other.listener) && Arc::ptr_eq(&self.server, &other.server)
  }
}

#[derive(Debug, Default)]
pub struct ServerRegistry {
  servers: Mutex<HashMap<String, ServerBinding>>,
}

impl ServerRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the binding registered for `uri`, building it with `create`
  /// when missing. The flag is true when the binding already existed.
  ///
  /// A failed `create` leaves the registry untouched.
  pub fn acquire_or_try_insert_with<E>(
    &self,
    uri: &str,
    create: impl FnOnce() -> Result<ServerBinding, E>,
  ) -> Result<(ServerBinding, bool), E> {
    let mut servers = self.servers.lock();
    if let Some(binding) = servers.get(uri) {
      return Ok((binding.clone(), true));
    }
    let binding = create()?;
    servers.insert(uri.to_string(), binding.clone());
    tracing::debug!(uri, registered = servers.len(), "server registered");
    Ok((binding, false))
  }

  pub fn get(&self, uri: &str) -> Option<ServerBinding> {
    self.servers.lock().get(uri).cloned()
  }

  pub fn contains(&self, uri: &str) -> bool {
    self.servers.lock().contains_key(uri)
  }

  pub fn len(&self) -> usize {
    self.servers.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.servers.lock().is_empty()
  }

  /// Forgets the binding for `uri`. Holders keep their handles; the socket
  /// closes once the last one is dropped.
  pub fn remove(&self, uri: &str) -> Option<ServerBinding> {
    self.servers.lock().remove(uri)
  }
}
