//! Factories turning validated configs into running pieces of a gRPC
//! security service.
//!
//! Every factory validates its config first and reports which config or
//! construction stage failed. Empty configs of optional features (health,
//! event notification, API services) yield a disabled result instead of an
//! error.
//!
//! ```ignore
//! let registry = ServerRegistry::new();
//! let binding = match service_factory::server(&cfg.server, &registry)? {
//!     Bound::New(binding) => binding,
//!     // another component already serves this uri; register on its server
//!     Bound::Existing(binding) => binding,
//! };
//! binding.server.add_services(|routes| {
//!     routes.add_service(CheckServer::new(my_impl));
//! });
//! ```

mod apiservices;
mod client;
mod error;
mod event_notify;
mod health;
mod logger;
mod server;

pub use apiservices::{api_autoloader, api_services};
pub use client::{ClientConn, client_conn, client_conn_with};
pub use error::{FactoryError, FactoryResult};
pub use event_notify::{event_notify, event_notify_buffer};
pub use health::{HealthBinding, health};
pub use logger::logger;
pub use server::{Bound, server};

pub use grpc_kit::{ServerBinding, ServerRegistry};
