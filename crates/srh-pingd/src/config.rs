//! Command line and configuration file support for srh-pingd
//!
//! The listen address and port always come from the command line. Everything
//! else has a default, can be set in an optional TOML file and can be
//! overridden again on the command line.

use crate::error::{PingdError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use srh_codec::DEFAULT_MAX_LINE_LENGTH;
use srh_types::Ipv6Address;
use std::fs;
use std::net::SocketAddrV6;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Segment routing ping server
#[derive(Parser, Debug, Clone)]
#[command(name = "srh-pingd")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IPv6 address of the interface to listen on
    #[arg(short = 'a', long)]
    pub address: Ipv6Address,

    /// TCP port to listen on
    #[arg(short = 'p', long)]
    pub port: u16,

    /// Segment list, one address per line, final destination last
    #[arg(short = 's', long)]
    pub segments: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Delay between pings in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Server behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Segment list file
    #[serde(default = "default_segments_file")]
    pub segments_file: PathBuf,

    /// Longest accepted segment list line, newline included
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Delay between pings in milliseconds
    #[serde(default = "default_ping_interval")]
    pub ping_interval_ms: u64,

    /// Message sent on every ping, followed by a NUL byte
    #[serde(default = "default_payload")]
    pub payload: String,

    /// Listen backlog
    #[serde(default = "default_backlog")]
    pub backlog: u32,
}

/// Complete srh-pingd configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingdConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_segments_file() -> PathBuf {
    PathBuf::from("segments.txt")
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_ping_interval() -> u64 {
    1000
}

fn default_payload() -> String {
    "PING.\n".to_string()
}

fn default_backlog() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            segments_file: default_segments_file(),
            max_line_length: default_max_line_length(),
            ping_interval_ms: default_ping_interval(),
            payload: default_payload(),
            backlog: default_backlog(),
        }
    }
}

impl PingdConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                PingdError::Config(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "srh-pingd: Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(PingdError::Io(e)),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.max_line_length < 2 {
            return Err(PingdError::Config(
                "max_line_length must be >= 2".to_string(),
            ));
        }

        if self.server.ping_interval_ms == 0 {
            return Err(PingdError::Config(
                "ping_interval_ms must be > 0".to_string(),
            ));
        }

        if self.server.payload.is_empty() {
            return Err(PingdError::Config("payload must not be empty".to_string()));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Get ping interval as Duration
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    /// Ping message as sent on the wire
    pub fn message(&self) -> Vec<u8> {
        let mut message = self.payload.as_bytes().to_vec();
        message.push(0);
        message
    }
}

/// Effective settings after merging the file and the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub listen: SocketAddrV6,
    pub server: ServerConfig,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => PingdConfig::load_or_default(path)?,
            None => PingdConfig::default(),
        };

        if let Some(segments) = &args.segments {
            config.server.segments_file = segments.clone();
        }
        if let Some(interval_ms) = args.interval_ms {
            config.server.ping_interval_ms = interval_ms;
        }

        if args.port == 0 {
            return Err(PingdError::Config("port must be > 0".to_string()));
        }
        config.validate()?;

        Ok(Self {
            listen: SocketAddrV6::new(args.address.inner(), args.port, 0, 0),
            server: config.server,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PingdConfig::default();
        assert_eq!(config.server.segments_file, PathBuf::from("segments.txt"));
        assert_eq!(config.server.max_line_length, 256);
        assert_eq!(config.server.ping_interval_ms, 1000);
        assert_eq!(config.server.payload, "PING.\n");
        assert_eq!(config.server.backlog, 10);
    }

    #[test]
    fn test_message_is_nul_terminated() {
        assert_eq!(ServerConfig::default().message(), b"PING.\n\0".to_vec());
    }

    #[test]
    fn test_args_require_address_and_port() {
        assert!(Args::try_parse_from(["srh-pingd"]).is_err());
        assert!(Args::try_parse_from(["srh-pingd", "-a", "2001:db8::1"]).is_err());
        assert!(Args::try_parse_from(["srh-pingd", "-p", "5000"]).is_err());
        assert!(Args::try_parse_from(["srh-pingd", "-a", "not-an-address", "-p", "5000"]).is_err());
        assert!(Args::try_parse_from(["srh-pingd", "-a", "2001:db8::1", "-p", "70000"]).is_err());
    }

    #[test]
    fn test_settings_from_args() {
        let args = parse(&["srh-pingd", "-a", "2001:db8:0:1::1", "-p", "5000"]);
        let settings = Settings::from_args(&args).unwrap();

        assert_eq!(settings.listen.to_string(), "[2001:db8:0:1::1]:5000");
        assert_eq!(settings.server, ServerConfig::default());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nsegments_file = \"/etc/srh/route.txt\"\nping_interval_ms = 250\npayload = \"HELLO\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = parse(&[
            "srh-pingd", "-a", "::1", "-p", "9000", "-c", &path, "--interval-ms", "50",
        ]);
        let settings = Settings::from_args(&args).unwrap();

        assert_eq!(settings.server.segments_file, PathBuf::from("/etc/srh/route.txt"));
        assert_eq!(settings.server.ping_interval_ms, 50);
        assert_eq!(settings.server.payload, "HELLO");
        assert_eq!(settings.server.max_line_length, 256);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PingdConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PingdConfig::default());
    }

    #[test]
    fn test_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbacklog = ").unwrap();
        let err = PingdConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, PingdError::Config(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = PingdConfig::default();
        assert!(config.validate().is_ok());

        config.server.ping_interval_ms = 0;
        assert!(config.validate().is_err());

        config = PingdConfig::default();
        config.server.max_line_length = 1;
        assert!(config.validate().is_err());

        config = PingdConfig::default();
        config.server.payload.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let args = parse(&["srh-pingd", "-a", "::1", "-p", "0"]);
        assert!(matches!(
            Settings::from_args(&args),
            Err(PingdError::Config(_))
        ));
    }
}
