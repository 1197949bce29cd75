use crate::error::{ApiServiceError, ApiServiceResult};
use crate::service::{ApiService, Discover};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Services built up front, by id.
#[derive(Default)]
pub struct Registry {
    services: RwLock<HashMap<String, Arc<dyn ApiService>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: impl Into<String>, service: Arc<dyn ApiService>) -> ApiServiceResult<()> {
        let id = id.into();
        let mut services = self.services.write();
        if services.contains_key(&id) {
            return Err(ApiServiceError::DuplicateId(id));
        }
        services.insert(id, service);
        Ok(())
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.services.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl Discover for Registry {
    fn get_service(&self, id: &str) -> Option<Arc<dyn ApiService>> {
        self.services.read().get(id).cloned()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::Plain;

    fn plain(id: &str) -> Arc<dyn ApiService> {
        Arc::new(Plain {
            id: id.to_string(),
            api: "luids.xlist.v1.Check".to_string(),
        })
    }

    #[test]
    fn test_register_and_discover() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        registry.register("xlist", plain("xlist")).unwrap();
        registry.register("dnsxl", plain("dnsxl")).unwrap();

        assert_eq!(registry.ids(), vec!["dnsxl", "xlist"]);
        assert_eq!(registry.get_service("xlist").unwrap().id(), "xlist");
        assert!(registry.get_service("missing").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = Registry::new();
        registry.register("xlist", plain("xlist")).unwrap();
        let err = registry.register("xlist", plain("xlist")).unwrap_err();
        assert!(matches!(err, ApiServiceError::DuplicateId(id) if id == "xlist"));
        assert_eq!(registry.len(), 1);
    }
}
