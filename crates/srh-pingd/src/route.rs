//! Loading the route the server installs on its connections.

use crate::error::{PingdError, Result};
use srh_codec::{hex_dump, SegmentRoutingHeader, SegmentSource};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Reads the segment list at `path` and builds the routing header from it.
pub fn load_header(path: &Path, max_line_length: usize) -> Result<SegmentRoutingHeader> {
    let file = File::open(path).map_err(|source| PingdError::SegmentsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let header = SegmentSource::new(max_line_length).build_header(BufReader::new(file))?;
    info!(path = %path.display(), segments = header.segment_count(), "srh-pingd: Done reading segment file");
    Ok(header)
}

/// Logs the encoded header and each of its segment addresses.
pub fn log_header(header: &SegmentRoutingHeader) {
    let bytes = header.to_bytes();
    info!(
        len = bytes.len(),
        "srh-pingd: Hex dump of routing header:\n{}",
        hex_dump(&bytes)
    );
    for (index, segment) in header.addresses().enumerate() {
        info!(index, %segment, "srh-pingd: Segment");
    }
    debug!(%header, "srh-pingd: Routing header ready");
}
