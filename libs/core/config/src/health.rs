use crate::args::{env_key, flag_arg, get_flag, get_list, get_string, list_arg, string_arg};
use crate::network::validate_allowed;
use crate::{
    env_list_or, env_or_default, env_parse_or, ConfigError, ConfigResult, Configurable, FromEnv,
    IpFilter, ListenUri,
};
use clap::{ArgMatches, Command};

/// HTTP health server preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthCfg {
    pub listen_uri: String,
    pub allowed: Vec<String>,
    /// Expose prometheus metrics on `/metrics`.
    pub metrics: bool,
    /// Expose runtime diagnostics under `/debug`.
    pub profile: bool,
}

impl HealthCfg {
    pub fn listen(&self) -> ConfigResult<ListenUri> {
        ListenUri::parse(&self.listen_uri)
    }

    pub fn ip_filter(&self) -> ConfigResult<IpFilter> {
        IpFilter::allow_list(&self.allowed)
    }
}

impl Configurable for HealthCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        cmd.arg(string_arg(prefix, "listenuri", &self.listen_uri, "Health and metrics socket."))
            .arg(flag_arg(prefix, "metrics", self.metrics, "Expose prometheus metrics."))
            .arg(flag_arg(prefix, "profile", self.profile, "Expose runtime diagnostics."))
            .arg(list_arg(prefix, "allowed", &self.allowed, "List of allowed IPs or CIDRs."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_string(matches, prefix, "listenuri") {
            self.listen_uri = v;
        }
        if let Some(v) = get_flag(matches, prefix, "metrics") {
            self.metrics = v;
        }
        if let Some(v) = get_flag(matches, prefix, "profile") {
            self.profile = v;
        }
        if let Some(v) = get_list(matches, prefix, "allowed") {
            self.allowed = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.listen_uri.is_empty() && self.allowed.is_empty() && !self.metrics && !self.profile
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.listen_uri.is_empty() {
            return Err(ConfigError::Required("listen uri"));
        }
        self.listen()?;
        validate_allowed(&self.allowed)
    }
}

impl FromEnv for HealthCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        Ok(Self {
            listen_uri: env_or_default(&env_key(prefix, "listenuri"), ""),
            allowed: env_list_or(&env_key(prefix, "allowed"), &[]),
            metrics: env_parse_or(&env_key(prefix, "metrics"), false)?,
            profile: env_parse_or(&env_key(prefix, "profile"), false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(HealthCfg::default().is_empty());
        let cfg = HealthCfg {
            profile: true,
            ..Default::default()
        };
        assert!(!cfg.is_empty());
    }

    #[test]
    fn test_validate() {
        let mut cfg = HealthCfg {
            listen_uri: "tcp://127.0.0.1:8081".to_string(),
            allowed: vec!["127.0.0.1".to_string()],
            metrics: true,
            profile: false,
        };
        assert!(cfg.validate().is_ok());

        cfg.allowed = vec!["127.0.0.1/40".to_string()];
        assert!(cfg.validate().is_err());

        cfg.allowed.clear();
        cfg.listen_uri = "127.0.0.1:8081".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUri { .. })));
    }

    #[test]
    fn test_prefixed_flags() {
        let cmd = HealthCfg::default().register_args(Command::new("svc"), "health");
        let matches = cmd
            .try_get_matches_from([
                "svc",
                "--health.listenuri",
                "tcp://0.0.0.0:8081",
                "--health.allowed",
                "10.0.0.0/8",
                "--health.profile",
            ])
            .unwrap();

        let mut cfg = HealthCfg::default();
        cfg.load_matches(&matches, "health");
        assert_eq!(cfg.listen_uri, "tcp://0.0.0.0:8081");
        assert_eq!(cfg.allowed, vec!["10.0.0.0/8"]);
        assert!(cfg.profile);
        assert!(!cfg.metrics);
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("HEALTH_LISTENURI", Some("tcp://0.0.0.0:8081")),
                ("HEALTH_ALLOWED", None),
                ("HEALTH_METRICS", Some("true")),
                ("HEALTH_PROFILE", None),
            ],
            || {
                let cfg = HealthCfg::from_env("health").unwrap();
                assert_eq!(cfg.listen_uri, "tcp://0.0.0.0:8081");
                assert!(cfg.allowed.is_empty());
                assert!(cfg.metrics);
                assert!(!cfg.profile);
            },
        );
    }
}
