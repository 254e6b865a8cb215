//! Startup path of srh-pingd: command line, config file and segment file
//! through to the bytes handed to the socket layer.

use clap::Parser;
use pretty_assertions::assert_eq;
use srh_pingd::{load_header, Args, PingdError, Settings};
use std::fs;

#[test]
fn test_startup_builds_exact_header_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let segments = dir.path().join("route.txt");
    fs::write(
        &segments,
        "# final destination last\n2001:db8:0:8::1\n2001:db8:0:7::1\n\n2001:db8:0:1::2\n",
    )
    .unwrap();

    let config = dir.path().join("pingd.toml");
    fs::write(
        &config,
        format!("[server]\nsegments_file = {:?}\n", segments.to_str().unwrap()),
    )
    .unwrap();

    let args = Args::try_parse_from([
        "srh-pingd",
        "-a",
        "2001:db8:0:1::1",
        "-p",
        "5000",
        "-c",
        config.to_str().unwrap(),
    ])
    .unwrap();
    let settings = Settings::from_args(&args).unwrap();
    assert_eq!(settings.server.segments_file, segments);

    let header = load_header(
        &settings.server.segments_file,
        settings.server.max_line_length,
    )
    .unwrap();
    let bytes = header.to_bytes();

    assert_eq!(bytes.len(), 8 + 3 * 16);
    assert_eq!(&bytes[..8], &[0, 6, 4, 2, 2, 0, 0, 0]);
    assert_eq!(bytes[8..24], "2001:db8:0:8::1".parse::<std::net::Ipv6Addr>().unwrap().octets());
}

#[test]
fn test_startup_fails_on_empty_segment_file() {
    let dir = tempfile::tempdir().unwrap();
    let segments = dir.path().join("segments.txt");
    fs::write(&segments, "# nothing configured\n\n").unwrap();

    let err = load_header(&segments, 256).unwrap_err();
    assert!(matches!(err, PingdError::Srh(srh_codec::SrhError::Empty)));
}
