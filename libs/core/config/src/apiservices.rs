use crate::args::{env_key, get_list, get_string, list_arg, string_arg};
use crate::files::{dir_exists, file_exists, has_extension};
use crate::{env_list_or, env_or_default, ConfigError, ConfigResult, Configurable, FromEnv};
use clap::{ArgMatches, Command};
use std::path::PathBuf;

/// Extension carried by service definition files.
pub const SERVICE_DEFS_EXTENSION: &str = "json";

/// Where API service definitions are loaded from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiServicesCfg {
    pub config_dirs: Vec<String>,
    pub config_files: Vec<String>,
    /// Base path for relative certificate paths inside definitions.
    pub certs_dir: String,
}

impl Configurable for ApiServicesCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        cmd.arg(list_arg(prefix, "dirs", &self.config_dirs, "Configuration dirs."))
            .arg(list_arg(prefix, "files", &self.config_files, "Configuration files."))
            .arg(string_arg(prefix, "certsdir", &self.certs_dir, "Base path to certificate files."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_list(matches, prefix, "dirs") {
            self.config_dirs = v;
        }
        if let Some(v) = get_list(matches, prefix, "files") {
            self.config_files = v;
        }
        if let Some(v) = get_string(matches, prefix, "certsdir") {
            self.certs_dir = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.config_files.is_empty() && self.config_dirs.is_empty()
    }

    fn validate(&self) -> ConfigResult<()> {
        for file in &self.config_files {
            if !file_exists(file) {
                return Err(ConfigError::NotFound {
                    what: "config file",
                    path: PathBuf::from(file),
                });
            }
            if !has_extension(file, SERVICE_DEFS_EXTENSION) {
                return Err(ConfigError::invalid(
                    "config file",
                    file.as_str(),
                    "without .json extension",
                ));
            }
        }
        for dir in &self.config_dirs {
            if !dir_exists(dir) {
                return Err(ConfigError::NotFound {
                    what: "config dir",
                    path: PathBuf::from(dir),
                });
            }
        }
        if self.is_empty() {
            return Err(ConfigError::Required("config"));
        }
        if !self.certs_dir.is_empty() && !dir_exists(&self.certs_dir) {
            return Err(ConfigError::NotFound {
                what: "certificates dir",
                path: PathBuf::from(&self.certs_dir),
            });
        }
        Ok(())
    }
}

impl FromEnv for ApiServicesCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        Ok(Self {
            config_dirs: env_list_or(&env_key(prefix, "dirs"), &[]),
            config_files: env_list_or(&env_key(prefix, "files"), &[]),
            certs_dir: env_or_default(&env_key(prefix, "certsdir"), ""),
        })
    }
}
