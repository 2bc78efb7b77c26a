//! IP address and port checks.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// IP protocol version accepted by [`is_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// Dotted-quad IPv4.
    V4,
    /// IPv6, including IPv4-mapped forms.
    V6,
}

impl IpVersion {
    /// Numeric version, used in messages.
    pub fn number(&self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }
}

/// IP address check. `None` accepts either version.
pub fn is_ip(value: &str, version: Option<IpVersion>) -> bool {
    match version {
        Some(IpVersion::V4) => value.parse::<Ipv4Addr>().is_ok(),
        Some(IpVersion::V6) => value.parse::<Ipv6Addr>().is_ok(),
        None => value.parse::<Ipv4Addr>().is_ok() || value.parse::<Ipv6Addr>().is_ok(),
    }
}

/// Integer in `0..=65535`.
pub fn is_port(value: f64) -> bool {
    crate::numeric::is_integer(value) && (0.0..=65535.0).contains(&value)
}
