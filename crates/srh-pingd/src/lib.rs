//! Segment routing ping server
//!
//! Listens for one TCP client over IPv6, installs a segment routing header
//! built from a text file on the accepted connection and sends it a ping
//! message once per interval. The header itself is built by `srh-codec`.
//!
//! ```text
//! segments.txt ──▶ SegmentSource ──▶ SegmentRoutingHeader ──▶ to_bytes()
//!                                                               │
//!                      accept() ──▶ setsockopt(IPV6_RTHDR) ◀────┘
//!                                          │
//!                                          ▼
//!                                   "PING.\n\0" every interval
//! ```

pub mod config;
pub mod error;
pub mod route;
pub mod server;

pub use config::{Args, PingdConfig, ServerConfig, Settings};
pub use error::{PingdError, Result};
pub use route::{load_header, log_header};
pub use server::{send_pings, set_routing_header, PingServer};
