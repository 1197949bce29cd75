use crate::error::{FactoryError, FactoryResult};
use core_config::{Configurable, LogFormat, LoggerCfg};
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, Registry};
use tracing_subscriber::prelude::*;

/// Builds a logger as a [`Dispatch`] to install globally or per task.
///
/// An empty config logs at `info` in the default format. `debug` forces the
/// `debug` level and reports the source file and line of every event.
///
/// ```ignore
/// let dispatch = service_factory::logger(&cfg, args.debug)?;
/// tracing::dispatcher::set_global_default(dispatch)?;
/// ```
pub fn logger(cfg: &LoggerCfg, debug: bool) -> FactoryResult<Dispatch> {
    let (level, format) = if cfg.is_empty() {
        (LevelFilter::INFO, LogFormat::default())
    } else {
        cfg.validate()
            .map_err(|e| FactoryError::config("logger", e))?;
        (
            cfg.level_filter()
                .map_err(|e| FactoryError::config("logger", e))?,
            cfg.log_format()
                .map_err(|e| FactoryError::config("logger", e))?,
        )
    };
    let level = if debug { LevelFilter::DEBUG } else { level };

    let fmt = tracing_subscriber::fmt::layer()
        .with_file(debug)
        .with_line_number(debug);
    let output: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => fmt.json().with_target(false).flatten_event(true).boxed(),
        LogFormat::Text => fmt.compact().with_ansi(false).boxed(),
        LogFormat::Log => fmt.with_target(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .with(level);
    Ok(Dispatch::new(subscriber))
}
