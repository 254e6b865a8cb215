//! IPv6 Segment Routing Header codec.
//!
//! Builds, edits and inspects the variable-length type 4 routing header
//! that the kernel accepts through the `IPV6_RTHDR` socket option:
//!
//! - [`layout`]: byte offsets and [`space_for`]
//! - [`SegmentRoutingHeader`]: bulk build, `append`, `reverse`, queries and
//!   the wire encoding
//! - [`SegmentSource`]: ordered address lists from line-oriented text
//! - [`hex_dump`]: rendering for logs
//!
//! # Example
//!
//! ```
//! use srh_codec::{SegmentRoutingHeader, SegmentSource};
//! use std::io::Cursor;
//!
//! let input = "# destination last\n2001:db8:0:2::1\n2001:db8:0:1::2\n";
//! let header = SegmentSource::default().build_header(Cursor::new(input)).unwrap();
//!
//! assert_eq!(header.segment_count(), 2);
//! assert_eq!(header.to_bytes().len(), 8 + 2 * 16);
//! ```

pub mod dump;
pub mod error;
pub mod header;
pub mod layout;
pub mod segments;

pub use dump::hex_dump;
pub use error::{Result, SrhError};
pub use header::SegmentRoutingHeader;
pub use layout::{space_for, MAX_SEGMENTS, ROUTING_TYPE_SRH};
pub use segments::{SegmentSource, DEFAULT_MAX_LINE_LENGTH};
pub use srh_types::{Ipv6Address, ParseError};
