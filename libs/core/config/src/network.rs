//! Allowed-peer parsing and the IP filter built from it.

use crate::ConfigError;
use ipnet::IpNet;
use std::net::IpAddr;

/// Parses an allow-list entry: CIDR notation or a bare IPv4/IPv6 address.
pub fn parse_peer(entry: &str) -> Result<IpNet, ConfigError> {
    let entry = entry.trim();
    if let Ok(net) = entry.parse::<IpNet>() {
        return Ok(net);
    }
    entry
        .parse::<IpAddr>()
        .map(IpNet::from)
        .map_err(|_| ConfigError::invalid("allowed", entry, "not a valid ip or cidr"))
}

/// Checks every entry of an allow-list.
pub fn validate_allowed(entries: &[String]) -> Result<(), ConfigError> {
    entries.iter().try_for_each(|entry| parse_peer(entry).map(|_| ()))
}

/// Set of networks permitted to connect. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpFilter {
    nets: Vec<IpNet>,
}

impl IpFilter {
    /// Builds a whitelist from CIDR/IP strings.
    pub fn allow_list<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nets = entries
            .into_iter()
            .map(|e| parse_peer(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nets })
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn nets(&self) -> &[IpNet] {
        &self.nets
    }

    pub fn is_allowed(&self, ip: IpAddr) -> bool {
        if self.nets.is_empty() {
            return true;
        }
        // v4 peers on dual-stack sockets show up as ::ffff:a.b.c.d
        let ip = ip.to_canonical();
        self.nets.iter().any(|net| net.contains(&ip))
    }
}
