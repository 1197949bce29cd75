use crate::args::{env_key, flag_arg, get_flag, get_list, get_string, list_arg, string_arg};
use crate::network::validate_allowed;
use crate::{
    env_list_or, env_or_default, env_parse_or, ConfigError, ConfigResult, Configurable, FromEnv,
    IpFilter, ListenUri, ServerTlsCfg,
};
use clap::{ArgMatches, Command};

/// gRPC server preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerCfg {
    pub listen_uri: String,
    /// CIDRs or IPs allowed to connect; empty means anyone.
    pub allowed: Vec<String>,
    pub tls: ServerTlsCfg,
    pub metrics: bool,
}

impl ServerCfg {
    pub fn new(listen_uri: impl Into<String>) -> Self {
        Self {
            listen_uri: listen_uri.into(),
            ..Default::default()
        }
    }

    pub fn listen(&self) -> ConfigResult<ListenUri> {
        ListenUri::parse(&self.listen_uri)
    }

    pub fn ip_filter(&self) -> ConfigResult<IpFilter> {
        IpFilter::allow_list(&self.allowed)
    }
}

impl Configurable for ServerCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        let mut listen = string_arg(prefix, "listenuri", &self.listen_uri, "Server socket.");
        if prefix.is_empty() {
            listen = listen.short('l');
        }
        cmd.arg(listen)
            .arg(list_arg(prefix, "allowed", &self.allowed, "List of allowed IPs or CIDRs."))
            .arg(string_arg(prefix, "certfile", &self.tls.cert_file, "Path to server cert file."))
            .arg(string_arg(prefix, "keyfile", &self.tls.key_file, "Path to server key file."))
            .arg(string_arg(prefix, "cacert", &self.tls.ca_cert, "Path to CA cert file."))
            .arg(flag_arg(prefix, "clientauth", self.tls.client_auth, "Require client auth."))
            .arg(flag_arg(prefix, "metrics", self.metrics, "Enable metrics."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_string(matches, prefix, "listenuri") {
            self.listen_uri = v;
        }
        if let Some(v) = get_list(matches, prefix, "allowed") {
            self.allowed = v;
        }
        if let Some(v) = get_string(matches, prefix, "certfile") {
            self.tls.cert_file = v;
        }
        if let Some(v) = get_string(matches, prefix, "keyfile") {
            self.tls.key_file = v;
        }
        if let Some(v) = get_string(matches, prefix, "cacert") {
            self.tls.ca_cert = v;
        }
        if let Some(v) = get_flag(matches, prefix, "clientauth") {
            self.tls.client_auth = v;
        }
        if let Some(v) = get_flag(matches, prefix, "metrics") {
            self.metrics = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.listen_uri.is_empty() && self.allowed.is_empty() && !self.tls.use_tls() && !self.metrics
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.listen_uri.is_empty() {
            return Err(ConfigError::Required("listen uri"));
        }
        self.listen()?;
        validate_allowed(&self.allowed)?;
        if self.tls.use_tls() {
            self.tls.validate()?;
        }
        Ok(())
    }
}

impl FromEnv for ServerCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        Ok(Self {
            listen_uri: env_or_default(&env_key(prefix, "listenuri"), ""),
            allowed: env_list_or(&env_key(prefix, "allowed"), &[]),
            tls: ServerTlsCfg {
                cert_file: env_or_default(&env_key(prefix, "certfile"), ""),
                key_file: env_or_default(&env_key(prefix, "keyfile"), ""),
                ca_cert: env_or_default(&env_key(prefix, "cacert"), ""),
                client_auth: env_parse_or(&env_key(prefix, "clientauth"), false)?,
            },
            metrics: env_parse_or(&env_key(prefix, "metrics"), false)?,
        })
    }
}
