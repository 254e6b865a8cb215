//! Address primitive for IPv6 segment routing.
//!
//! The segment routing header codec only ever needs one thing from the
//! address layer: turning presentation-form text into 16 network-order
//! octets and back again.
//!
//! - [`Ipv6Address`]: a 128-bit IPv6 address value

mod ip;

pub use ip::Ipv6Address;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IPv6 address format: {0}")]
    InvalidIpv6Address(String),
}
