//! Unit tests for packet types, header layouts, and complete packets.

use bytes::Bytes;
use rstest::rstest;

use super::*;
use crate::error::{FramingError, HeaderError};

#[rstest]
#[case::command(0x01, Some(PacketType::Command))]
#[case::acl(0x02, Some(PacketType::AclData))]
#[case::sco(0x03, Some(PacketType::SynchronousData))]
#[case::event(0x04, Some(PacketType::Event))]
#[case::zero(0x00, None)]
#[case::iso(0x05, None)]
#[case::high(0xFF, None)]
fn markers_map_to_packet_types(#[case] byte: u8, #[case] expected: Option<PacketType>) {
    assert_eq!(PacketType::from_marker(byte), expected);
    if let Some(packet_type) = expected {
        assert_eq!(packet_type.marker(), byte);
    }
}

#[test]
fn synchronous_data_has_no_header_layout() {
    assert!(!PacketType::SynchronousData.is_supported());
    assert_eq!(
        PacketHeader::parse(PacketType::SynchronousData, &[0, 0, 0]),
        Err(FramingError::UnsupportedPacketType {
            packet_type: PacketType::SynchronousData
        })
    );
}

#[test]
fn try_from_rejects_unknown_marker() {
    assert_eq!(
        PacketType::try_from(0x42),
        Err(FramingError::UnrecognisedMarker { byte: 0x42 })
    );
}

#[test]
fn command_header_is_opcode_then_length() {
    let header = PacketHeader::parse(PacketType::Command, &[0x03, 0x0C, 0x05]).expect("parse");
    assert_eq!(
        header,
        PacketHeader::Command(CommandHeader::new(0x0C03, 5))
    );
    assert_eq!(header.payload_len(), 5);
    assert_eq!(header.len(), CommandHeader::LEN);
}

#[test]
fn acl_header_unpacks_handle_and_flags() {
    // handle 0x0ABC, pb 0b10, bc 0b01 -> 0b01_10_1010_1011_1100 = 0x6ABC
    let header =
        PacketHeader::parse(PacketType::AclData, &[0xBC, 0x6A, 0x1B, 0x00]).expect("parse");
    let PacketHeader::AclData(acl) = header else {
        panic!("expected ACL header, got {header:?}");
    };
    assert_eq!(acl.handle(), 0x0ABC);
    assert_eq!(acl.packet_boundary_flag(), 0b10);
    assert_eq!(acl.broadcast_flag(), 0b01);
    assert_eq!(acl.data_total_length(), 27);
}

#[test]
fn acl_header_writes_packed_word() {
    let header = AclDataHeader::new(0x0ABC, 0b10, 0b01, 0x0102).expect("fields fit");
    let mut buf = Vec::new();
    PacketHeader::from(header).write(&mut buf);
    assert_eq!(buf, vec![0xBC, 0x6A, 0x02, 0x01]);
}

#[rstest]
#[case::handle(0x1000, 0, 0, "handle")]
#[case::boundary(0x0001, 4, 0, "packet_boundary_flag")]
#[case::broadcast(0x0001, 0, 4, "broadcast_flag")]
fn acl_header_rejects_fields_wider_than_their_bits(
    #[case] handle: u16,
    #[case] pb: u8,
    #[case] bc: u8,
    #[case] field: &str,
) {
    let err = AclDataHeader::new(handle, pb, bc, 0).expect_err("field should not fit");
    let HeaderError::FieldOutOfRange { field: got, .. } = err;
    assert_eq!(got, field);
}

#[test]
fn event_header_is_code_then_length() {
    let header = PacketHeader::parse(PacketType::Event, &[0x0E, 0x04]).expect("parse");
    assert_eq!(header, PacketHeader::Event(EventHeader::new(0x0E, 4)));
    assert_eq!(header.packet_type(), PacketType::Event);
}

#[rstest]
#[case::command_short(PacketType::Command, &[0x03, 0x0C][..], 3)]
#[case::acl_long(PacketType::AclData, &[0, 0, 0, 0, 0][..], 4)]
#[case::event_short(PacketType::Event, &[0x0E][..], 2)]
fn header_parse_requires_exact_length(
    #[case] packet_type: PacketType,
    #[case] bytes: &[u8],
    #[case] need: usize,
) {
    assert_eq!(
        PacketHeader::parse(packet_type, bytes),
        Err(FramingError::Truncated {
            have: bytes.len(),
            need
        })
    );
}

#[test]
fn complete_packet_rejects_mismatched_payload() {
    let header = EventHeader::new(0x0E, 3);
    let err = CompletePacket::new(header.into(), Bytes::from_static(&[1, 2]))
        .expect_err("length mismatch");
    assert_eq!(
        err,
        FramingError::LengthMismatch {
            declared: 3,
            actual: 2
        }
    );
}

#[test]
fn complete_packet_body_is_header_then_payload() {
    let header = EventHeader::new(0x0E, 2);
    let packet =
        CompletePacket::new(header.into(), Bytes::from_static(&[0xAA, 0xBB])).expect("packet");
    assert_eq!(packet.body().as_ref(), &[0x0E, 0x02, 0xAA, 0xBB]);
    assert_eq!(packet.len(), 4);
    assert!(!packet.is_empty());
}

#[test]
fn from_body_parses_pre_framed_packet() {
    let packet = CompletePacket::from_body(PacketType::Command, &[0x03, 0x0C, 0x01, 0x7F])
        .expect("valid command body");
    assert_eq!(packet.packet_type(), PacketType::Command);
    assert_eq!(packet.payload().as_ref(), &[0x7F]);
}

#[rstest]
#[case::short_header(PacketType::AclData, &[0x01, 0x00][..], FramingError::Truncated { have: 2, need: 4 })]
#[case::short_payload(
    PacketType::Event,
    &[0x0E, 0x03, 0x01][..],
    FramingError::LengthMismatch { declared: 3, actual: 1 }
)]
#[case::trailing_bytes(
    PacketType::Command,
    &[0x03, 0x0C, 0x00, 0x01][..],
    FramingError::LengthMismatch { declared: 0, actual: 1 }
)]
fn from_body_rejects_inconsistent_bodies(
    #[case] packet_type: PacketType,
    #[case] body: &[u8],
    #[case] expected: FramingError,
) {
    assert_eq!(CompletePacket::from_body(packet_type, body), Err(expected));
}
