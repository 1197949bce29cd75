use crate::args::{env_key, get_number, get_string, number_arg, string_arg};
use crate::{env_or_default, env_parse_or, ConfigError, ConfigResult, Configurable, FromEnv};
use clap::{ArgMatches, Command};
use std::time::Duration;

/// Event notification client, resolved through the API service registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventNotifyCfg {
    /// API service id of the notifier.
    pub service: String,
    pub buffer: usize,
    /// Milliseconds to hold events while collapsing duplicates; 0 disables it.
    pub wait_dups: u64,
}

impl EventNotifyCfg {
    pub fn new(service: impl Into<String>, buffer: usize) -> Self {
        Self {
            service: service.into(),
            buffer,
            wait_dups: 0,
        }
    }

    pub fn wait_dups(&self) -> Duration {
        Duration::from_millis(self.wait_dups)
    }
}

impl Configurable for EventNotifyCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        cmd.arg(string_arg(prefix, "service", &self.service, "API Service ID."))
            .arg(number_arg(prefix, "buffer", self.buffer, "Buffer size."))
            .arg(number_arg(prefix, "waitdups", self.wait_dups, "Wait for duplicates in milliseconds."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_string(matches, prefix, "service") {
            self.service = v;
        }
        if let Some(v) = get_number(matches, prefix, "buffer") {
            self.buffer = v;
        }
        if let Some(v) = get_number(matches, prefix, "waitdups") {
            self.wait_dups = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.service.is_empty()
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.service.is_empty() {
            return Err(ConfigError::Required("service name"));
        }
        if self.buffer == 0 {
            return Err(ConfigError::invalid(
                "buffer",
                self.buffer.to_string(),
                "buffer size must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl FromEnv for EventNotifyCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            service: env_or_default(&env_key(prefix, "service"), ""),
            buffer: env_parse_or(&env_key(prefix, "buffer"), defaults.buffer)?,
            wait_dups: env_parse_or(&env_key(prefix, "waitdups"), defaults.wait_dups)?,
        })
    }
}
