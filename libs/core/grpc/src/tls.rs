//! Transport credentials from TLS settings.

use crate::error::{GrpcError, GrpcResult};
use core_config::{ClientTlsCfg, ServerTlsCfg};
use std::path::Path;
use tonic::transport::{Certificate, ClientTlsConfig, Identity, ServerTlsConfig};

fn read_pem(path: &str) -> GrpcResult<Vec<u8>> {
  std::fs::read(path).map_err(|source| GrpcError::ReadCredentials {
    path: Path::new(path).to_path_buf(),
    source,
  })
}

/// Server identity plus, when a CA is given, client certificate verification.
/// Client certificates are mandatory only with `client_auth`.
pub fn server_tls_config(cfg: &ServerTlsCfg) -> GrpcResult<ServerTlsConfig> {
  cfg.validate()?;
  let identity = Identity::from_pem(read_pem(&cfg.cert_file)?, read_pem(&cfg.key_file)?);
  let mut tls = ServerTlsConfig::new().identity(identity);
  if !cfg.ca_cert.is_empty() {
    tls = tls
      .client_ca_root(Certificate::from_pem(read_pem(&cfg.ca_cert)?))
      .client_auth_optional(!cfg.client_auth);
  }
  Ok(tls)
}

/// Client credentials. A pinned server certificate is trusted like a CA.
pub fn client_tls_config(cfg: &ClientTlsCfg) -> GrpcResult<ClientTlsConfig> {
  cfg.validate()?;
  let mut tls = ClientTlsConfig::new();
  if !cfg.server_name.is_empty() {
    tls = tls.domain_name(cfg.server_name.clone());
  }
  if !cfg.ca_cert.is_empty() {
    tls = tls.ca_certificate(Certificate::from_pem(read_pem(&cfg.ca_cert)?));
  }
  if !cfg.server_cert.is_empty() {
    tls = tls.ca_certificate(Certificate::from_pem(read_pem(&cfg.server_cert)?));
  }
  if cfg.use_system_cas {
    tls = tls.with_native_roots();
  }
  if cfg.has_identity() {
    tls = tls.identity(Identity::from_pem(
      read_pem(&cfg.cert_file)?,
      read_pem(&cfg.key_file)?,
    ));
  }
  Ok(tls)
}
