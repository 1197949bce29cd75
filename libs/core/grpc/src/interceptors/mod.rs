/// Re-export tonic's Interceptor trait for convenience
pub use tonic::service::Interceptor;

pub mod chain;
pub mod metrics;
mod peer_filter;

pub use chain::{InterceptedServer, InterceptorChain, ServerInterceptor};
pub use metrics::ClientMetricsInterceptor;
