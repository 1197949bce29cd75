use crate::args::{env_key, flag_arg, get_flag, get_string, string_arg};
use crate::{
    env_or_default, env_parse_or, ClientTlsCfg, ConfigResult, Configurable, FromEnv, ListenUri,
};
use clap::{ArgMatches, Command};

/// gRPC client preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientCfg {
    /// `tcp://host:port` or `unix:///path`
    pub remote_uri: String,
    pub tls: ClientTlsCfg,
    pub metrics: bool,
}

impl Configurable for ClientCfg {
    fn register_args(&self, cmd: Command, prefix: &str) -> Command {
        let mut uri = string_arg(prefix, "uri", &self.remote_uri, "URI to grpc service.");
        if prefix.is_empty() {
            uri = uri.short('r');
        }
        cmd.arg(uri)
            .arg(string_arg(prefix, "clientcert", &self.tls.cert_file, "Path to grpc client cert file."))
            .arg(string_arg(prefix, "clientkey", &self.tls.key_file, "Path to grpc client key file."))
            .arg(string_arg(prefix, "servercert", &self.tls.server_cert, "Path to grpc server cert file."))
            .arg(string_arg(prefix, "servername", &self.tls.server_name, "Server name of grpc service for TLS check."))
            .arg(string_arg(prefix, "cacert", &self.tls.ca_cert, "Path to grpc CA cert file."))
            .arg(flag_arg(prefix, "systemca", self.tls.use_system_cas, "Use system CA pool for grpc check."))
            .arg(flag_arg(prefix, "metrics", self.metrics, "Enable metrics."))
    }

    fn load_matches(&mut self, matches: &ArgMatches, prefix: &str) {
        if let Some(v) = get_string(matches, prefix, "uri") {
            self.remote_uri = v;
        }
        if let Some(v) = get_string(matches, prefix, "clientcert") {
            self.tls.cert_file = v;
        }
        if let Some(v) = get_string(matches, prefix, "clientkey") {
            self.tls.key_file = v;
        }
        if let Some(v) = get_string(matches, prefix, "servercert") {
            self.tls.server_cert = v;
        }
        if let Some(v) = get_string(matches, prefix, "servername") {
            self.tls.server_name = v;
        }
        if let Some(v) = get_string(matches, prefix, "cacert") {
            self.tls.ca_cert = v;
        }
        if let Some(v) = get_flag(matches, prefix, "systemca") {
            self.tls.use_system_cas = v;
        }
        if let Some(v) = get_flag(matches, prefix, "metrics") {
            self.metrics = v;
        }
    }

    fn is_empty(&self) -> bool {
        self.remote_uri.is_empty() && !self.tls.use_tls()
    }

    fn validate(&self) -> ConfigResult<()> {
        ListenUri::parse(&self.remote_uri)?;
        if self.tls.use_tls() {
            self.tls.validate()?;
        }
        Ok(())
    }
}

impl FromEnv for ClientCfg {
    fn from_env(prefix: &str) -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            remote_uri: env_or_default(&env_key(prefix, "uri"), &defaults.remote_uri),
            tls: ClientTlsCfg {
                cert_file: env_or_default(&env_key(prefix, "clientcert"), ""),
                key_file: env_or_default(&env_key(prefix, "clientkey"), ""),
                server_cert: env_or_default(&env_key(prefix, "servercert"), ""),
                server_name: env_or_default(&env_key(prefix, "servername"), ""),
                ca_cert: env_or_default(&env_key(prefix, "cacert"), ""),
                use_system_cas: env_parse_or(&env_key(prefix, "systemca"), false)?,
            },
            metrics: env_parse_or(&env_key(prefix, "metrics"), false)?,
        })
    }
}
