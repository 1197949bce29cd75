use crate::def::ServiceDef;
use crate::error::{ApiServiceError, ApiServiceResult};
use crate::service::ApiService;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type BuildFn =
    Arc<dyn Fn(&ServiceDef) -> ApiServiceResult<Arc<dyn ApiService>> + Send + Sync>;

/// Builders keyed by API name.
#[derive(Clone, Default)]
pub struct ServiceBuilders {
    builders: HashMap<String, BuildFn>,
}

impl ServiceBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the builder for `api`, replacing any previous one.
    pub fn register<F>(&mut self, api: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&ServiceDef) -> ApiServiceResult<Arc<dyn ApiService>> + Send + Sync + 'static,
    {
        self.builders.insert(api.into(), Arc::new(build));
        self
    }

    pub fn supports(&self, api: &str) -> bool {
        self.builders.contains_key(api)
    }

    pub fn build(&self, def: &ServiceDef) -> ApiServiceResult<Arc<dyn ApiService>> {
        let build = self
            .builders
            .get(&def.api)
            .ok_or_else(|| ApiServiceError::UnknownApi {
                id: def.id.clone(),
                api: def.api.clone(),
            })?;
        tracing::debug!(service = %def.id, api = %def.api, endpoint = %def.endpoint, "building api service");
        build(def).map_err(|e| match e {
            ApiServiceError::Build { ref id, .. } if *id == def.id => e,
            other => ApiServiceError::build(&def.id, other),
        })
    }
}

impl fmt::Debug for ServiceBuilders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut apis: Vec<_> = self.builders.keys().collect();
        apis.sort();
        f.debug_struct("ServiceBuilders").field("apis", &apis).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{def, plain_builders};
    use super::*;

    #[test]
    fn test_build_known_api() {
        let builders = plain_builders("luids.xlist.v1.Check");
        assert!(builders.supports("luids.xlist.v1.Check"));
        let svc = builders.build(&def("xlist", "luids.xlist.v1.Check")).unwrap();
        assert_eq!(svc.id(), "xlist");
        assert!(svc.notifier().is_none());
    }

    #[test]
    fn test_build_unknown_api() {
        let builders = plain_builders("luids.xlist.v1.Check");
        let err = builders.build(&def("dns", "luids.dnsutil.v1.Resolv")).err().unwrap();
        assert!(matches!(err, ApiServiceError::UnknownApi { .. }));
        assert!(err.to_string().contains("dns"));
    }

    #[test]
    fn test_builder_error_names_service() {
        let mut builders = ServiceBuilders::new();
        builders.register("luids.event.v1.Notify", |_| {
            Err(ApiServiceError::build("archive", "endpoint refused"))
        });
        let err = builders
            .build(&def("notify", "luids.event.v1.Notify"))
            .err()
            .unwrap();
        assert!(matches!(&err, ApiServiceError::Build { id, .. } if id == "notify"));
        assert!(err.to_string().starts_with("building 'notify': "));
        assert!(err.to_string().contains("endpoint refused"));
    }

    #[test]
    fn test_builder_error_already_naming_service_kept() {
        let mut builders = ServiceBuilders::new();
        builders.register("luids.event.v1.Notify", |def| {
            Err(ApiServiceError::build(&def.id, "bad opts"))
        });
        let err = builders
            .build(&def("notify", "luids.event.v1.Notify"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "building 'notify': bad opts");
    }
}
