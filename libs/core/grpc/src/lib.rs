//! # gRPC Kit
//!
//! Listeners, servers and client channels for gRPC services configured by
//! `core_config`.
//!
//! ## Features
//!
//! - **Listeners**: `tcp://` and `unix://` sockets bound up front, served later
//! - **Server registry**: one socket and one server per listen URI, shared by
//!   every component asking for it
//! - **Interceptors**: peer allow-list and Prometheus call metrics on servers,
//!   call counting on clients
//! - **Channels**: lazy client channels over TCP or unix sockets, with TLS
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_kit::{ChannelConfig, ListenUri, connect_lazy};
//!
//! let channel = connect_lazy(&ListenUri::parse("tcp://127.0.0.1:5801")?, None, &ChannelConfig::default())?;
//! let client = CheckClient::new(channel);
//! ```

pub mod channel;
pub mod error;
pub mod interceptors;
pub mod listener;
pub mod registry;
pub mod server;
pub mod tls;

pub use channel::{ChannelConfig, connect_lazy};
pub use core_config::ListenUri;
pub use error::{GrpcError, GrpcResult};
pub use interceptors::{ClientMetricsInterceptor, InterceptorChain, ServerInterceptor};
pub use listener::{BoundSocket, Listener, LocalAddr};
pub use registry::{ServerBinding, ServerRegistry};
pub use server::GrpcServer;
pub use tls::{client_tls_config, server_tls_config};
pub use tonic::transport::Channel;

// Re-export for services registering on a GrpcServer
pub use tonic::service::RoutesBuilder;
