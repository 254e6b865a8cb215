//! IPv6 address type with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Length in bytes of an address on the wire.
pub(crate) const OCTETS: usize = 16;

/// An IPv6 address stored as sixteen octets in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv6Address(Ipv6Addr);

impl Ipv6Address {
    pub const UNSPECIFIED: Self = Ipv6Address(Ipv6Addr::UNSPECIFIED);
    pub const LOCALHOST: Self = Ipv6Address(Ipv6Addr::LOCALHOST);
    pub const LEN: usize = OCTETS;

    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: u16, b: u16, c: u16, d: u16, e: u16, f: u16, g: u16, h: u16) -> Self {
        Ipv6Address(Ipv6Addr::new(a, b, c, d, e, f, g, h))
    }

    /// Builds an address from its network-order octets.
    pub fn from_octets(octets: [u8; OCTETS]) -> Self {
        Ipv6Address(Ipv6Addr::from(octets))
    }

    pub const fn inner(&self) -> Ipv6Addr {
        self.0
    }

    pub const fn octets(&self) -> [u8; OCTETS] {
        self.0.octets()
    }

    pub const fn segments(&self) -> [u16; 8] {
        self.0.segments()
    }

    /// Returns true for `::`, the value of a slot nothing was written to.
    pub fn is_unspecified(&self) -> bool {
        self.0.is_unspecified()
    }
}

impl Default for Ipv6Address {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv6Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv6Addr>()
            .map(Ipv6Address)
            .map_err(|_| ParseError::InvalidIpv6Address(s.to_string()))
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Ipv6Address(addr)
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(addr: Ipv6Address) -> Self {
        addr.0
    }
}

impl From<[u8; OCTETS]> for Ipv6Address {
    fn from(octets: [u8; OCTETS]) -> Self {
        Ipv6Address::from_octets(octets)
    }
}
