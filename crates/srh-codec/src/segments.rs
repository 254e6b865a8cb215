//! Reading ordered segment lists from line-oriented text.
//!
//! One address per line, in presentation form. Blank lines and lines
//! starting with `#` are skipped. Reads are bounded: a line that does not
//! end in `\n` within `max_line_length - 1` bytes ends the input, exactly as
//! end of file does.

use crate::error::Result;
use crate::header::SegmentRoutingHeader;
use std::io::{BufRead, Read};
use tracing::debug;

/// Default bound on a single line, newline included.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 256;

/// Produces the ordered list of address strings for the header builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSource {
    max_line_length: usize,
}

impl Default for SegmentSource {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl SegmentSource {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Collects the address lines of `reader`, in file order, with their
    /// trailing newline removed.
    pub fn read_ordered_addresses<R: BufRead>(&self, mut reader: R) -> Result<Vec<String>> {
        let mut addresses = Vec::new();

        while let Some(line) = self.next_line(&mut reader)? {
            if line.len() <= 1 {
                continue;
            }

            let text = &line[..line.len() - 1];
            if text.starts_with('#') {
                continue;
            }

            addresses.push(text.to_string());
        }

        debug!(count = addresses.len(), "read segment list");
        Ok(addresses)
    }

    /// Reads the segment list from `reader` and builds a header from it.
    pub fn build_header<R: BufRead>(&self, reader: R) -> Result<SegmentRoutingHeader> {
        let lines = self.read_ordered_addresses(reader)?;
        SegmentRoutingHeader::build_from_text(&lines)
    }

    /// Next newline-terminated line, or `None` once the bounded read comes
    /// back without a newline.
    fn next_line<R: BufRead>(&self, reader: &mut R) -> Result<Option<String>> {
        // One byte of the bound is reserved for the reader's terminator.
        let limit = self.max_line_length.saturating_sub(1) as u64;

        let mut buf = Vec::new();
        reader.by_ref().take(limit).read_until(b'\n', &mut buf)?;

        if buf.last() != Some(&b'\n') {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
