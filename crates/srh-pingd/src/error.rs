//! Error types for srh-pingd

use srh_codec::SrhError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Ping server errors
#[derive(Debug, Error)]
pub enum PingdError {
    /// Building the routing header failed
    #[error("Failed to build SRH: {0}")]
    Srh(#[from] SrhError),

    /// The segments file could not be opened
    #[error("Error opening segment file `{}`: {source}", .path.display())]
    SegmentsFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The kernel refused the routing header
    #[error("SRH setsockopt failed (errno {errno}): {message}. Are you running kernel 4.10 or newer?")]
    SocketOption { errno: i32, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for srh-pingd operations
pub type Result<T> = std::result::Result<T, PingdError>;
