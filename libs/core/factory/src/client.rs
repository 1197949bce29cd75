use crate::error::{FactoryError, FactoryResult};
use core_config::{ClientCfg, Configurable, ListenUri};
use grpc_kit::{Channel, ChannelConfig, ClientMetricsInterceptor, client_tls_config, connect_lazy};

/// A lazily connected channel plus the interceptor to install on clients
/// built from it.
#[derive(Debug, Clone)]
pub struct ClientConn {
    uri: ListenUri,
    channel: Channel,
    interceptor: ClientMetricsInterceptor,
}

impl ClientConn {
    pub fn uri(&self) -> &ListenUri {
        &self.uri
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    pub fn interceptor(&self) -> ClientMetricsInterceptor {
        self.interceptor.clone()
    }

    pub fn into_parts(self) -> (Channel, ClientMetricsInterceptor) {
        (self.channel, self.interceptor)
    }
}

/// Client connection with the default channel settings.
///
/// Must be called within a tokio runtime. No connection is attempted until
/// the first call.
pub fn client_conn(cfg: &ClientCfg) -> FactoryResult<ClientConn> {
    client_conn_with(cfg, &ChannelConfig::default())
}

pub fn client_conn_with(cfg: &ClientCfg, channel_cfg: &ChannelConfig) -> FactoryResult<ClientConn> {
    cfg.validate()
        .map_err(|e| FactoryError::config("client", e))?;
    let uri = ListenUri::parse(&cfg.remote_uri).map_err(|e| FactoryError::config("client", e))?;

    let tls = if cfg.tls.use_tls() {
        Some(client_tls_config(&cfg.tls).map_err(|e| FactoryError::grpc("initializing TLS", e))?)
    } else {
        None
    };
    if cfg.metrics {
        observability::init_metrics()
            .map_err(|e| FactoryError::build("installing metrics recorder", e))?;
    }

    let channel = connect_lazy(&uri, tls, channel_cfg)
        .map_err(|e| FactoryError::grpc("creating channel", e))?;

    Ok(ClientConn {
        uri,
        channel,
        interceptor: ClientMetricsInterceptor::new(cfg.metrics),
    })
}
