use core_config::IpFilter;
use http::Extensions;
use std::net::SocketAddr;
use tonic::Status;
use tonic::transport::server::{TcpConnectInfo, TlsConnectInfo};

/// Remote address recorded by tonic for TCP (plain or TLS) connections.
pub(crate) fn remote_addr(extensions: &Extensions) -> Option<SocketAddr> {
  extensions
    .get::<TcpConnectInfo>()
    .and_then(TcpConnectInfo::remote_addr)
    .or_else(|| {
      extensions
        .get::<TlsConnectInfo<TcpConnectInfo>>()
        .and_then(|info| info.get_ref().remote_addr())
    })
}

/// Rejects peers outside the allow-list.
///
/// Connections without an IP peer (unix sockets) are local and pass.
pub(crate) fn check_peer(filter: &IpFilter, extensions: &Extensions) -> Result<(), Status> {
  match remote_addr(extensions) {
    Some(addr) if !filter.is_allowed(addr.ip()) => {
      tracing::debug!(peer = %addr, "peer rejected by ip filter");
      Err(Status::permission_denied(format!(
        "peer {} is not allowed",
        addr.ip()
      )))
    }
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_no_peer_info_passes() {
    let filter = IpFilter::allow_list(["10.0.0.0/8"]).unwrap();
    assert!(check_peer(&filter, &Extensions::new()).is_ok());
  }

  fn from_peer(peer: &str) -> Extensions {
    let mut extensions = Extensions::new();
    extensions.insert(TcpConnectInfo {
      local_addr: None,
      remote_addr: Some(peer.parse().unwrap()),
    });
    extensions
  }

  #[test]
  fn test_rejects_peer_outside_allow_list() {
    let filter = IpFilter::allow_list(["10.0.0.0/8"]).unwrap();
    let status = check_peer(&filter, &from_peer("8.8.8.8:40000")).unwrap_err();
    assert_eq!(status.code(), tonic::Code::PermissionDenied);
    assert!(status.message().contains("8.8.8.8"));
  }

  #[test]
  fn test_allows_peer_inside_allow_list() {
    let filter = IpFilter::allow_list(["10.0.0.0/8"]).unwrap();
    assert!(check_peer(&filter, &from_peer("10.1.1.1:40000")).is_ok());
  }

  #[test]
  fn test_empty_filter_allows_any_peer() {
    assert!(check_peer(&IpFilter::default(), &from_peer("8.8.8.8:40000")).is_ok());
  }

  #[test]
  fn test_remote_addr_from_tcp_info() {
    assert_eq!(
      remote_addr(&from_peer("10.1.1.1:40000")),
      Some("10.1.1.1:40000".parse().unwrap())
    );
  }

  #[test]
  fn test_remote_addr_absent() {
    assert_eq!(remote_addr(&Extensions::new()), None);
  }
}
