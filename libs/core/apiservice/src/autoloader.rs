use crate::builders::ServiceBuilders;
use crate::def::ServiceDef;
use crate::error::ApiServiceResult;
use crate::service::{ApiService, Discover};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds services from their definitions on first lookup.
///
/// A built service is cached; a failed build is not, so a later lookup
/// retries it.
pub struct Autoloader {
    defs: HashMap<String, ServiceDef>,
    builders: ServiceBuilders,
    loaded: Mutex<HashMap<String, Arc<dyn ApiService>>>,
}

impl Autoloader {
    /// Later definitions with a repeated id replace earlier ones.
    pub fn new(defs: Vec<ServiceDef>, builders: ServiceBuilders) -> Self {
        Self {
            defs: defs.into_iter().map(|def| (def.id.clone(), def)).collect(),
            builders,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Ids that can be loaded, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.defs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.lock().contains_key(id)
    }

    /// Service `id`, built now if needed. `Ok(None)` when no definition has
    /// that id.
    pub fn load(&self, id: &str) -> ApiServiceResult<Option<Arc<dyn ApiService>>> {
        let Some(def) = self.defs.get(id) else {
            return Ok(None);
        };
        // held across the build so a service is never built twice
        let mut loaded = self.loaded.lock();
        if let Some(service) = loaded.get(id) {
            return Ok(Some(service.clone()));
        }
        let service = self.builders.build(def)?;
        loaded.insert(id.to_string(), service.clone());
        Ok(Some(service))
    }
}

impl Discover for Autoloader {
    fn get_service(&self, id: &str) -> Option<Arc<dyn ApiService>> {
        match self.load(id) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(service = %id, error = %e, "autoloading api service failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for Autoloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autoloader")
            .field("ids", &self.ids())
            .field("builders", &self.builders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::{def, plain_builders, Plain};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_lazy_and_cached() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let mut builders = ServiceBuilders::new();
        builders.register("luids.xlist.v1.Check", move |def| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Plain {
                id: def.id.clone(),
                api: def.api.clone(),
            }) as Arc<dyn ApiService>)
        });

        let loader = Autoloader::new(vec![def("xlist", "luids.xlist.v1.Check")], builders);
        assert!(!loader.is_loaded("xlist"));
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        let first = loader.get_service("xlist").unwrap();
        let second = loader.get_service("xlist").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(loader.is_loaded("xlist"));
    }

    #[test]
    fn test_unknown_id_and_failed_build() {
        let loader = Autoloader::new(
            vec![def("dns", "luids.dnsutil.v1.Resolv")],
            plain_builders("luids.xlist.v1.Check"),
        );
        assert!(loader.get_service("missing").is_none());
        assert!(loader.get_service("dns").is_none());
        assert!(loader.load("dns").is_err());
        assert!(!loader.is_loaded("dns"));
        assert_eq!(loader.ids(), vec!["dns"]);
    }
}
