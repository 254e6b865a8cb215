//! Binary layout of the type 4 segment routing header.
//!
//! ```text
//!  0               1               2               3
//! +---------------+---------------+---------------+---------------+
//! |  Next Header  |  Hdr Ext Len  | Routing Type  | Segments Left |
//! +---------------+---------------+---------------+---------------+
//! |  Last Entry   |     Flags     |              Tag              |
//! +---------------+---------------+---------------+---------------+
//! |                  Segment List[0] (128 bits)                   |
//! |                              ...                              |
//! |                  Segment List[n-1] (128 bits)                 |
//! +---------------+---------------+---------------+---------------+
//! ```
//!
//! All offsets used by the codec come from here.

use srh_types::Ipv6Address;

/// The only routing type this codec understands.
pub const ROUTING_TYPE_SRH: u8 = 4;

/// Size of the fixed part, in bytes.
pub const FIXED_HEADER_LEN: usize = 8;

/// Size of one segment slot, in bytes.
pub const SEGMENT_LEN: usize = Ipv6Address::LEN;

/// Largest segment count accepted by [`space_for`].
pub const MAX_SEGMENTS: i32 = 255;

pub const NEXT_HEADER_OFFSET: usize = 0;
pub const HDR_EXT_LEN_OFFSET: usize = 1;
pub const ROUTING_TYPE_OFFSET: usize = 2;
pub const SEGMENTS_LEFT_OFFSET: usize = 3;
pub const LAST_ENTRY_OFFSET: usize = 4;
pub const FLAGS_OFFSET: usize = 5;
pub const TAG_OFFSET: usize = 6;
pub const SEGMENTS_OFFSET: usize = FIXED_HEADER_LEN;

/// Bytes needed for a header of `routing_type` carrying `segments` addresses.
///
/// Returns 0 for any routing type other than 4 and for segment counts
/// outside `[0, 255]`.
pub fn space_for(routing_type: u8, segments: i32) -> usize {
    if routing_type != ROUTING_TYPE_SRH || !(0..=MAX_SEGMENTS).contains(&segments) {
        return 0;
    }
    FIXED_HEADER_LEN + segments as usize * SEGMENT_LEN
}

/// Length field value for `segments` addresses, in units of 8 octets.
///
/// The field is 8 bits wide, so counts above 127 wrap.
pub fn ext_len_for(segments: usize) -> u8 {
    ((segments * SEGMENT_LEN / 8) & 0xff) as u8
}

/// Segment count encoded by a length field value.
pub fn segments_for_ext_len(hdr_ext_len: u8) -> usize {
    usize::from(hdr_ext_len) * 8 / SEGMENT_LEN
}

/// Byte offset of slot `index`.
pub fn segment_offset(index: usize) -> usize {
    SEGMENTS_OFFSET + index * SEGMENT_LEN
}
