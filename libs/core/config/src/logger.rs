use crate::args::{env_key, get_string, string_arg};
use crate::{env_or_default, ConfigError, ConfigResult, Configurable, FromEnv};
use clap::{ArgMatches, Command};
use tracing::level_filters::LevelFilter;

/// Output format of the logger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain `log` style lines; also used when no format is given.
    #[default]
    Log,
    Json,
    /// Compact single-line text without colors.
    Text,
}

/// Logger preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggerCfg {
    pub level: String,
    pub format: String,
}

impl LoggerCfg {
    pub fn new(level: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: format.into(),
        }
    }

    pub fn log_format(&self) -> ConfigResult<LogFormat> {
        match self.format.to_ascii_lowercase().as_str() {
            "" | "log" => Ok(LogFormat::Log),
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(ConfigError::invalid(
                "format",
                self.format.as_str(),
                "expected one of json, text, log",
            )),
        }
    }

    pub fn level_filter(&self) -> ConfigResult<LevelFilter> {
        match self.level.to_ascii_lowercase().as_str() {
            "error" => Ok(LevelFilter::ERROR),
            "warn" | "warning" => Ok(LevelFilter::WARN),
            "info" => Ok(LevelFilter::INFO),
            "debug" => Ok(LevelFilter::DEBUG),
            _ => Err(ConfigError::invalid(
                "level",
                self.level.as_str(),
                "expected one of error, warn, info, debug",
            )),
        }
    }
}

impl Configurable for LoggerCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        cmd.arg(string_arg(prefix, "level", &self.level, "Log level."))
            .arg(string_arg(prefix, "format", &self.format, "Log format."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_string(matches, prefix, "level") {
            self.level = v;
        }
        if let Some(v) = get_string(matches, prefix, "format") {
            self.format = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.level.is_empty() && self.format.is_empty()
    }

    fn validate(&self) -> ConfigResult<()> {
        self.log_format()?;
        self.level_filter()?;
        Ok(())
    }
}

impl FromEnv for LoggerCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        Ok(Self {
            level: env_or_default(&env_key(prefix, "level"), ""),
            format: env_or_default(&env_key(prefix, "format"), ""),
        })
    }
}
