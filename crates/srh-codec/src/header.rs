//! The type 4 segment routing header.
//!
//! A [`SegmentRoutingHeader`] keeps the fixed fields as plain values and the
//! address slots in a separate list whose length is fixed when the header is
//! created. The two are only laid out as one contiguous buffer by
//! [`SegmentRoutingHeader::encode_into`] and [`SegmentRoutingHeader::to_bytes`].
//!
//! `segments_left` plays two roles. The bulk builder and `reverse` treat it
//! as the number of segments still to visit, while `append` uses it as the
//! write cursor of an incremental construction. Both behaviors are kept as-is.

use crate::error::{Result, SrhError};
use crate::layout::{
    ext_len_for, segment_offset, segments_for_ext_len, space_for, FIXED_HEADER_LEN,
    FLAGS_OFFSET, HDR_EXT_LEN_OFFSET, LAST_ENTRY_OFFSET, MAX_SEGMENTS, NEXT_HEADER_OFFSET,
    ROUTING_TYPE_OFFSET, ROUTING_TYPE_SRH, SEGMENTS_LEFT_OFFSET, SEGMENTS_OFFSET, SEGMENT_LEN,
    TAG_OFFSET,
};
use srh_types::Ipv6Address;
use std::fmt;
use tracing::debug;

/// An IPv6 segment routing header (routing type 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRoutingHeader {
    pub(crate) next_header: u8,
    pub(crate) hdr_ext_len: u8,
    pub(crate) routing_type: u8,
    pub(crate) segments_left: u8,
    pub(crate) last_entry: u8,
    pub(crate) flags: u8,
    pub(crate) tag: u16,
    /// Always at least `segment_count()` long.
    pub(crate) slots: Vec<Ipv6Address>,
}

impl SegmentRoutingHeader {
    /// Initializes an empty header with room for `segments` addresses.
    ///
    /// `capacity` is the number of bytes the caller is prepared to hand to
    /// the socket layer; it must cover [`space_for`] of the request. All
    /// fields start at zero except the length field and the routing type.
    ///
    /// # Errors
    ///
    /// - [`SrhError::UnsupportedType`] if `routing_type` is not 4
    /// - [`SrhError::InvalidSegmentCount`] if `segments` is outside `[0, 255]`
    /// - [`SrhError::InsufficientCapacity`] if `capacity` is too small
    pub fn init(capacity: usize, routing_type: u8, segments: i32) -> Result<Self> {
        if routing_type != ROUTING_TYPE_SRH {
            return Err(SrhError::UnsupportedType(routing_type));
        }
        if !(0..=MAX_SEGMENTS).contains(&segments) {
            return Err(SrhError::InvalidSegmentCount(segments));
        }

        let needed = space_for(routing_type, segments);
        if capacity < needed {
            return Err(SrhError::InsufficientCapacity {
                needed,
                available: capacity,
            });
        }

        let count = segments as usize;
        Ok(Self {
            hdr_ext_len: ext_len_for(count),
            ..Self::blank(count)
        })
    }

    /// Initializes an empty header sized exactly for `segments` addresses.
    pub fn with_segments(segments: i32) -> Result<Self> {
        Self::init(
            space_for(ROUTING_TYPE_SRH, segments),
            ROUTING_TYPE_SRH,
            segments,
        )
    }

    /// Builds a complete header from an ordered address list.
    ///
    /// Address `i` of the input lands in slot `i`. Once every slot is
    /// written, `segments_left` and `last_entry` are both set to `N - 1`.
    pub fn from_addresses(addresses: &[Ipv6Address]) -> Result<Self> {
        let count = addresses.len();
        if count == 0 {
            return Err(SrhError::Empty);
        }
        if count > MAX_SEGMENTS as usize {
            return Err(SrhError::TooManySegments(count));
        }

        let segments = count as i32;
        let mut header = Self::init(
            space_for(ROUTING_TYPE_SRH, segments),
            ROUTING_TYPE_SRH,
            segments,
        )?;
        header.slots.copy_from_slice(addresses);

        let last = (count - 1) as u8;
        header.segments_left = last;
        header.last_entry = last;

        debug!(
            segments = count,
            hdr_ext_len = header.hdr_ext_len,
            wire_len = header.wire_len(),
            "built segment routing header"
        );
        Ok(header)
    }

    /// Parses every entry of `lines` as an address, then builds the header.
    ///
    /// Nothing is allocated for the header unless every entry parses.
    pub fn build_from_text<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = lines
            .into_iter()
            .map(|line| line.as_ref().parse::<Ipv6Address>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_addresses(&addresses)
    }

    /// Writes `address` at the slot pointed to by `segments_left`, then
    /// advances both `segments_left` and `last_entry`.
    ///
    /// # Errors
    ///
    /// - [`SrhError::NoCapacity`] if the cursor already sits past the last slot
    /// - [`SrhError::AlreadyFull`] if `last_entry` already reached the end
    pub fn append(&mut self, address: Ipv6Address) -> Result<()> {
        let segments = self.segment_count();

        if segments as i64 - i64::from(self.segments_left) < 1 {
            return Err(SrhError::NoCapacity {
                segments_left: self.segments_left,
                segments,
            });
        }
        if usize::from(self.last_entry) >= segments {
            return Err(SrhError::AlreadyFull {
                last_entry: self.last_entry,
                segments,
            });
        }

        let index = usize::from(self.segments_left);
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(SrhError::NoCapacity {
                segments_left: self.segments_left,
                segments,
            });
        };
        *slot = address;
        self.segments_left += 1;
        self.last_entry += 1;

        debug!(%address, index, "appended segment");
        Ok(())
    }

    /// Reverses the route in place and sets `segments_left` to the full
    /// segment count.
    pub fn reverse_in_place(&mut self) -> Result<()> {
        self.check_type()?;

        let total = self.segment_count();
        for i in 0..total / 2 {
            self.slots.swap(i, total - 1 - i);
        }
        self.segments_left = total as u8;

        debug!(segments = total, "reversed segment routing header in place");
        Ok(())
    }

    /// Writes the reverse of this route into `dest`.
    ///
    /// The fixed fields are copied over first, so `dest` ends up with this
    /// header's length field and `last_entry`. Slots of `dest` beyond the
    /// segment count keep their contents.
    ///
    /// # Errors
    ///
    /// - [`SrhError::UnsupportedType`] if this header is not type 4
    /// - [`SrhError::InsufficientCapacity`] if `dest` has fewer slots than
    ///   this header has segments; `dest` is left untouched
    pub fn reverse_into(&self, dest: &mut Self) -> Result<()> {
        self.check_type()?;

        let total = self.segment_count();
        if dest.slots.len() < total {
            return Err(SrhError::InsufficientCapacity {
                needed: segment_offset(total),
                available: dest.wire_len(),
            });
        }

        dest.next_header = self.next_header;
        dest.hdr_ext_len = self.hdr_ext_len;
        dest.routing_type = self.routing_type;
        dest.last_entry = self.last_entry;
        dest.flags = self.flags;
        dest.tag = self.tag;

        for i in 0..total / 2 {
            let front = self.slots[i];
            dest.slots[i] = self.slots[total - 1 - i];
            dest.slots[total - 1 - i] = front;
        }
        if total % 2 != 0 {
            dest.slots[total / 2] = self.slots[total / 2];
        }
        dest.segments_left = total as u8;

        debug!(segments = total, "reversed segment routing header");
        Ok(())
    }

    /// Returns the reverse of this route as a new header with the same
    /// number of slots.
    pub fn reversed(&self) -> Result<Self> {
        let mut dest = Self::blank(self.slots.len());
        self.reverse_into(&mut dest)?;
        Ok(dest)
    }

    /// Number of segments encoded in the length field.
    pub fn segment_count(&self) -> usize {
        segments_for_ext_len(self.hdr_ext_len)
    }

    /// Returns the address stored at `index`.
    pub fn address_at(&self, index: i32) -> Result<Ipv6Address> {
        let segments = self.segment_count();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < segments)
            .and_then(|i| self.slots.get(i).copied())
            .ok_or(SrhError::IndexOutOfRange { index, segments })
    }

    /// Iterates over the addresses covered by the length field, in slot order.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv6Address> + '_ {
        self.slots.iter().take(self.segment_count()).copied()
    }

    /// Exact size of the encoded header: `8 + 16 * slots`.
    pub fn wire_len(&self) -> usize {
        segment_offset(self.slots.len())
    }

    /// Number of address slots the header was created with.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn next_header(&self) -> u8 {
        self.next_header
    }

    pub fn set_next_header(&mut self, next_header: u8) {
        self.next_header = next_header;
    }

    pub fn hdr_ext_len(&self) -> u8 {
        self.hdr_ext_len
    }

    pub fn routing_type(&self) -> u8 {
        self.routing_type
    }

    pub fn segments_left(&self) -> u8 {
        self.segments_left
    }

    pub fn last_entry(&self) -> u8 {
        self.last_entry
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// Serializes the header into the front of `buf`.
    ///
    /// Returns the number of bytes written, always [`Self::wire_len`].
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.wire_len();
        let available = buf.len();
        let Some(out) = buf.get_mut(..len) else {
            return Err(SrhError::InsufficientCapacity {
                needed: len,
                available,
            });
        };
        self.write_wire(out);
        Ok(len)
    }

    /// Serializes the header into an exactly sized buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.wire_len()];
        self.write_wire(&mut buf);
        buf
    }

    /// Parses a header produced outside this crate.
    ///
    /// Every 16-byte slot after the fixed part becomes an address slot; the
    /// length field must not claim more segments than there are slots.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FIXED_HEADER_LEN {
            return Err(SrhError::Truncated(bytes.len()));
        }

        let routing_type = bytes[ROUTING_TYPE_OFFSET];
        if routing_type != ROUTING_TYPE_SRH {
            return Err(SrhError::UnsupportedType(routing_type));
        }

        let body = &bytes[SEGMENTS_OFFSET..];
        if body.len() % SEGMENT_LEN != 0 {
            return Err(SrhError::InvalidLength(bytes.len()));
        }

        let hdr_ext_len = bytes[HDR_EXT_LEN_OFFSET];
        let needed = segment_offset(segments_for_ext_len(hdr_ext_len));
        if bytes.len() < needed {
            return Err(SrhError::InsufficientCapacity {
                needed,
                available: bytes.len(),
            });
        }

        let slots = body
            .chunks_exact(SEGMENT_LEN)
            .map(|chunk| {
                let mut octets = [0u8; SEGMENT_LEN];
                octets.copy_from_slice(chunk);
                Ipv6Address::from_octets(octets)
            })
            .collect();

        Ok(Self {
            next_header: bytes[NEXT_HEADER_OFFSET],
            hdr_ext_len,
            routing_type,
            segments_left: bytes[SEGMENTS_LEFT_OFFSET],
            last_entry: bytes[LAST_ENTRY_OFFSET],
            flags: bytes[FLAGS_OFFSET],
            tag: u16::from_be_bytes([bytes[TAG_OFFSET], bytes[TAG_OFFSET + 1]]),
            slots,
        })
    }

    /// `out` must be exactly `wire_len()` bytes.
    fn write_wire(&self, out: &mut [u8]) {
        out[NEXT_HEADER_OFFSET] = self.next_header;
        out[HDR_EXT_LEN_OFFSET] = self.hdr_ext_len;
        out[ROUTING_TYPE_OFFSET] = self.routing_type;
        out[SEGMENTS_LEFT_OFFSET] = self.segments_left;
        out[LAST_ENTRY_OFFSET] = self.last_entry;
        out[FLAGS_OFFSET] = self.flags;
        out[TAG_OFFSET..TAG_OFFSET + 2].copy_from_slice(&self.tag.to_be_bytes());

        for (index, address) in self.slots.iter().enumerate() {
            let offset = segment_offset(index);
            out[offset..offset + SEGMENT_LEN].copy_from_slice(&address.octets());
        }
    }

    fn blank(slots: usize) -> Self {
        Self {
            next_header: 0,
            hdr_ext_len: 0,
            routing_type: ROUTING_TYPE_SRH,
            segments_left: 0,
            last_entry: 0,
            flags: 0,
            tag: 0,
            slots: vec![Ipv6Address::UNSPECIFIED; slots],
        }
    }

    fn check_type(&self) -> Result<()> {
        if self.routing_type != ROUTING_TYPE_SRH {
            return Err(SrhError::UnsupportedType(self.routing_type));
        }
        Ok(())
    }
}

impl fmt::Display for SegmentRoutingHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SRH type {} ({} segments, segments_left {}, last_entry {})",
            self.routing_type,
            self.segment_count(),
            self.segments_left,
            self.last_entry
        )
    }
}
