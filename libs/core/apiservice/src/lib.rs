//! API services: named clients of remote gRPC APIs, described by JSON
//! service definitions and built through a table of builders keyed by API
//! name.
//!
//! Services are looked up through [`Discover`], implemented both by the eager
//! [`Registry`] and the lazy [`Autoloader`]. A service exposing extra
//! capabilities (such as event notification) does so through explicit
//! accessors on [`ApiService`].
//!
//! # Example
//!
//! ```ignore
//! let mut builders = ServiceBuilders::new();
//! builders.register("luids.event.v1.Notify", |def| {
//!     let conn = service_factory::client_conn(&def.client_cfg())?;
//!     Ok(Arc::new(NotifyClient::new(def.id.clone(), conn)) as Arc<dyn ApiService>)
//! });
//!
//! let registry = service_factory::api_services(&cfg, &builders)?;
//! let notifier = registry.get_service("notify").and_then(|svc| svc.notifier());
//! ```

mod autoloader;
mod builders;
mod def;
mod error;
mod registry;
mod service;

pub use autoloader::Autoloader;
pub use builders::{BuildFn, ServiceBuilders};
pub use def::{defs_from_file, ServiceDef};
pub use error::{ApiServiceError, ApiServiceResult};
pub use registry::Registry;
pub use service::{ApiService, Discover};
