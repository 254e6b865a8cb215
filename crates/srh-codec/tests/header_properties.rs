//! End-to-end properties of the segment routing header codec: text in,
//! wire bytes out.

use pretty_assertions::assert_eq;
use srh_codec::{
    space_for, Ipv6Address, SegmentRoutingHeader, SegmentSource, SrhError, ROUTING_TYPE_SRH,
};
use std::io::Cursor;

fn addresses(list: &[&str]) -> Vec<Ipv6Address> {
    list.iter().map(|s| s.parse().expect("valid IPv6")).collect()
}

#[test]
fn test_space_for_matches_built_header() {
    for n in [1usize, 2, 3, 16, 127] {
        let list: Vec<Ipv6Address> = (0..n)
            .map(|i| Ipv6Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, i as u16))
            .collect();
        let header = SegmentRoutingHeader::from_addresses(&list).unwrap();
        assert_eq!(header.to_bytes().len(), space_for(ROUTING_TYPE_SRH, n as i32));
        assert_eq!(header.segment_count(), n);
    }
}

#[test]
fn test_segments_file_to_wire_bytes() {
    let input = "\
# Final destination last, intermediate hops before it
2001:db8:0:8::1
2001:db8:0:7::1

2001:db8:0:5::1
";
    let header = SegmentSource::default()
        .build_header(Cursor::new(input))
        .unwrap();
    let bytes = header.to_bytes();

    assert_eq!(bytes.len(), 56);
    assert_eq!(&bytes[..8], &[0, 6, 4, 2, 2, 0, 0, 0]);

    let decoded = SegmentRoutingHeader::decode(&bytes).unwrap();
    assert_eq!(decoded, header);
    assert_eq!(
        decoded.addresses().map(|a| a.to_string()).collect::<Vec<_>>(),
        vec!["2001:db8:0:8::1", "2001:db8:0:7::1", "2001:db8:0:5::1"]
    );
}

#[test]
fn test_malformed_second_entry_builds_nothing() {
    let err = SegmentSource::default()
        .build_header(Cursor::new("2001:db8::1\n2001:db8::g\n2001:db8::3\n"))
        .unwrap_err();
    assert!(matches!(err, SrhError::InvalidFormat(_)));
}

#[test]
fn test_double_reverse_restores_order() {
    for list in [
        addresses(&["1::1", "2::2", "3::3", "4::4"]),
        addresses(&["1::1", "2::2", "3::3"]),
    ] {
        let mut header = SegmentRoutingHeader::from_addresses(&list).unwrap();
        header.reverse_in_place().unwrap();
        header.reverse_in_place().unwrap();
        assert_eq!(header.addresses().collect::<Vec<_>>(), list);
    }
}

#[test]
fn test_incremental_build_matches_bulk_addresses() {
    let list = addresses(&["fc00::1", "fc00::2", "fc00::3"]);

    let mut incremental = SegmentRoutingHeader::with_segments(3).unwrap();
    for address in &list {
        incremental.append(*address).unwrap();
    }
    let bulk = SegmentRoutingHeader::from_addresses(&list).unwrap();

    assert_eq!(
        incremental.addresses().collect::<Vec<_>>(),
        bulk.addresses().collect::<Vec<_>>()
    );
    // The two paths disagree on the counters.
    assert_eq!(incremental.segments_left(), 3);
    assert_eq!(incremental.last_entry(), 3);
    assert_eq!(bulk.segments_left(), 2);
    assert_eq!(bulk.last_entry(), 2);
}

#[test]
fn test_append_capacity_for_various_sizes() {
    for capacity in [0i32, 1, 5, 127] {
        let mut header = SegmentRoutingHeader::with_segments(capacity).unwrap();
        for _ in 0..capacity {
            header.append(Ipv6Address::LOCALHOST).unwrap();
        }
        assert!(matches!(
            header.append(Ipv6Address::LOCALHOST),
            Err(SrhError::NoCapacity { .. })
        ));
    }
}

#[test]
fn test_index_out_of_range_both_ends() {
    let header = SegmentRoutingHeader::from_addresses(&addresses(&["1::1", "2::2"])).unwrap();
    for index in [-1, 2, i32::MAX, i32::MIN] {
        assert!(matches!(
            header.address_at(index),
            Err(SrhError::IndexOutOfRange { .. })
        ));
    }
}
