pub mod config;

pub use config::ChannelConfig;

use crate::error::GrpcResult;
use core_config::ListenUri;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint, Uri};

// Authority is unused for unix sockets but the endpoint needs a valid URI.
const UNIX_AUTHORITY: &str = "localhost";

/// Creates a channel to `uri` that connects on the first call.
///
/// Must be called within a tokio runtime. An unreachable service is reported
/// by the calls made on the channel, not here.
///
/// ## Example
/// ```ignore
/// let uri = ListenUri::parse("unix:///run/xlist/check.socket")?;
/// let channel = connect_lazy(&uri, None, &ChannelConfig::default())?;
/// let client = CheckClient::new(channel);
/// ```
pub fn connect_lazy(
  uri: &ListenUri,
  tls: Option<ClientTlsConfig>,
  config: &ChannelConfig,
) -> GrpcResult<Channel> {
  let scheme = if tls.is_some() { "https" } else { "http" };
  let authority = match uri {
    ListenUri::Tcp(addr) => addr.as_str(),
    ListenUri::Unix(_) => UNIX_AUTHORITY,
  };

  let mut endpoint = config.apply_to_endpoint(Endpoint::from_shared(format!(
    "{scheme}://{authority}"
  ))?);
  if let Some(tls) = tls {
    endpoint = endpoint.tls_config(tls)?;
  }

  tracing::debug!(target: "grpc_kit", uri = %uri, scheme, "creating lazy gRPC channel");

  match uri {
    ListenUri::Tcp(_) => Ok(endpoint.connect_lazy()),
    #[cfg(unix)]
    ListenUri::Unix(path) => {
      let path = path.clone();
      let connector = tower::service_fn(move |_: Uri| {
        let path = path.clone();
        async move {
          let stream = tokio::net::UnixStream::connect(path).await?;
          Ok::<_, std::io::Error>(hyper_util::rt::TokioIo::new(stream))
        }
      });
      Ok(endpoint.connect_with_connector_lazy(connector))
    }
    #[cfg(not(unix))]
    ListenUri::Unix(_) => Err(crate::error::GrpcError::Listen {
      uri: uri.to_string(),
      source: std::io::Error::from(std::io::ErrorKind::Unsupported),
    }),
  }
}
