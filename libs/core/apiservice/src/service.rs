use event_notify::Notifier;
use std::sync::Arc;

/// A built API service.
pub trait ApiService: Send + Sync {
    fn id(&self) -> &str;

    /// Fully qualified API name, as in the service definition
    fn api(&self) -> &str;

    /// The service as an event notifier, when it is one.
    fn notifier(self: Arc<Self>) -> Option<Arc<dyn Notifier>> {
        None
    }
}

/// Service lookup by id.
pub trait Discover: Send + Sync {
    fn get_service(&self, id: &str) -> Option<Arc<dyn ApiService>>;
}
