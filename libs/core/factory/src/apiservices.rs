use crate::error::{FactoryError, FactoryResult};
use apiservice::{ApiServiceError, Autoloader, Registry, ServiceBuilders, ServiceDef, defs_from_file};
use core_config::apiservices::SERVICE_DEFS_EXTENSION;
use core_config::files::files_with_extension;
use core_config::{ApiServicesCfg, Configurable};
use std::path::Path;

/// Registry with every enabled service built up front. An empty config
/// yields an empty registry.
pub fn api_services(cfg: &ApiServicesCfg, builders: &ServiceBuilders) -> FactoryResult<Registry> {
    let registry = Registry::new();
    if cfg.is_empty() {
        return Ok(registry);
    }
    for def in enabled_defs(cfg)? {
        let service = builders
            .build(&def)
            .map_err(|e| FactoryError::build("building api service", e))?;
        registry
            .register(def.id.clone(), service)
            .map_err(|e| FactoryError::build("registering api service", e))?;
    }
    tracing::debug!(services = ?registry.ids(), "api services built");
    Ok(registry)
}

/// Autoloader building enabled services on first lookup. An empty config
/// yields an autoloader with nothing to load.
pub fn api_autoloader(cfg: &ApiServicesCfg, builders: ServiceBuilders) -> FactoryResult<Autoloader> {
    if cfg.is_empty() {
        return Ok(Autoloader::new(Vec::new(), builders));
    }
    Ok(Autoloader::new(enabled_defs(cfg)?, builders))
}

fn enabled_defs(cfg: &ApiServicesCfg) -> FactoryResult<Vec<ServiceDef>> {
    cfg.validate()
        .map_err(|e| FactoryError::config("apiservices", e))?;

    let files = files_with_extension(SERVICE_DEFS_EXTENSION, &cfg.config_files, &cfg.config_dirs)
        .map_err(|e| FactoryError::config("apiservices", e))?;

    let mut defs = Vec::new();
    for file in files {
        tracing::debug!(file = %file.display(), "loading service definitions");
        let loaded = defs_from_file(&file).map_err(|e| {
            if matches!(e, ApiServiceError::ReadDefs { .. }) {
                FactoryError::ResourceUnavailable {
                    stage: "loading service definitions",
                    source: Box::new(e),
                }
            } else {
                FactoryError::build("loading service definitions", e)
            }
        })?;
        defs.extend(loaded);
    }

    let certs_dir = (!cfg.certs_dir.is_empty()).then(|| Path::new(&cfg.certs_dir));
    Ok(defs
        .into_iter()
        .filter(|def| {
            if def.disabled {
                tracing::debug!(service = %def.id, "api service is disabled");
            }
            !def.disabled
        })
        .map(|mut def| {
            if let Some(dir) = certs_dir {
                def.resolve_certs(dir);
            }
            def
        })
        .collect())
}
