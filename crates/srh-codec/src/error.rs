//! Error types for segment routing header operations.
//!
//! Every failure is returned to the caller as a value. None of the codec
//! operations mutate a header or a caller buffer when they fail.

use srh_types::ParseError;
use std::io;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, SrhError>;

/// Errors that can occur while building, mutating or inspecting a header.
#[derive(Debug, Error)]
pub enum SrhError {
    /// Routing type other than 4.
    #[error("unsupported routing header type {0} (only type 4 is supported)")]
    UnsupportedType(u8),

    /// Caller buffer or destination header too small.
    #[error("insufficient capacity: need {needed} bytes, have {available}")]
    InsufficientCapacity {
        /// Bytes the operation requires.
        needed: usize,
        /// Bytes the caller provided.
        available: usize,
    },

    /// Segment count outside `[0, 255]` given to `init`.
    #[error("invalid segment count {0} (must be 0-255)")]
    InvalidSegmentCount(i32),

    /// Address text rejected by the address primitive.
    #[error("invalid address: {0}")]
    InvalidFormat(#[from] ParseError),

    /// `append` found no free slot under the current write cursor.
    #[error("no capacity left: segments_left {segments_left} of {segments} segments")]
    NoCapacity {
        /// Write cursor at the time of the call.
        segments_left: u8,
        /// Segment count encoded in the length field.
        segments: usize,
    },

    /// `append` on a header whose last entry already reached the end.
    #[error("header already full: last_entry {last_entry} of {segments} segments")]
    AlreadyFull {
        /// Last entry at the time of the call.
        last_entry: u8,
        /// Segment count encoded in the length field.
        segments: usize,
    },

    /// Inspector query outside `[0, segments)`.
    #[error("segment index {index} out of range for {segments} segments")]
    IndexOutOfRange {
        /// Requested index.
        index: i32,
        /// Segment count encoded in the length field.
        segments: usize,
    },

    /// Builder given no addresses.
    #[error("segment list is empty")]
    Empty,

    /// Builder given more than 255 addresses.
    #[error("too many segments: {0} (maximum 255)")]
    TooManySegments(usize),

    /// Wire buffer shorter than the fixed part of the header.
    #[error("truncated header: {0} bytes")]
    Truncated(usize),

    /// Wire buffer whose address area is not a whole number of slots.
    #[error("invalid header length {0}: address area is not a multiple of 16 bytes")]
    InvalidLength(usize),

    /// Failure of the underlying line reader.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
