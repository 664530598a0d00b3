//! Proptest strategies for generating packets and noisy streams.

use std::ops::Range;

use bytes::Bytes;
use hciframe::{
    AclDataHeader,
    CommandHeader,
    CompletePacket,
    EventHeader,
    FramingConfig,
    PacketHeader,
    PacketType,
};
use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any, prop_oneof},
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestRng, TestRunner},
};

/// Runner with a fixed seed so failures reproduce across runs.
#[must_use]
pub fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

/// Lengths biased towards the edges of `0..=max`.
pub fn boundary_length_strategy(max: usize) -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0usize),
        Just(1usize),
        Just(max.saturating_sub(1)),
        Just(max),
        0usize..=max,
    ]
}

fn payload_strategy(max: usize) -> impl Strategy<Value = Vec<u8>> {
    boundary_length_strategy(max).prop_flat_map(|len| vec(any::<u8>(), len))
}

fn command_strategy() -> impl Strategy<Value = CompletePacket> {
    (any::<u16>(), payload_strategy(usize::from(u8::MAX))).prop_map(|(opcode, params)| {
        let len = u8::try_from(params.len()).unwrap_or(u8::MAX);
        build(CommandHeader::new(opcode, len).into(), params)
    })
}

fn event_strategy() -> impl Strategy<Value = CompletePacket> {
    (any::<u8>(), payload_strategy(usize::from(u8::MAX))).prop_map(|(code, params)| {
        let len = u8::try_from(params.len()).unwrap_or(u8::MAX);
        build(EventHeader::new(code, len).into(), params)
    })
}

fn acl_strategy(max_data: usize) -> impl Strategy<Value = CompletePacket> {
    (
        0u16..=0x0FFF,
        0u8..=0b11,
        0u8..=0b11,
        payload_strategy(max_data.min(usize::from(u16::MAX))),
    )
        .prop_map(|(handle, pb, bc, data)| {
            let len = u16::try_from(data.len()).unwrap_or(u16::MAX);
            let header = AclDataHeader::new(handle, pb, bc, len)
                .unwrap_or_else(|err| panic!("generated ACL fields out of range: {err}"));
            build(header.into(), data)
        })
}

fn build(header: PacketHeader, payload: Vec<u8>) -> CompletePacket {
    CompletePacket::new(header, Bytes::from(payload))
        .unwrap_or_else(|err| panic!("generated packet is inconsistent: {err}"))
}

/// Any packet `config` admits, of any framed type.
pub fn packet_strategy(config: FramingConfig) -> impl Strategy<Value = CompletePacket> {
    prop_oneof![
        command_strategy(),
        event_strategy(),
        acl_strategy(config.max_payload_len(PacketType::AclData).unwrap_or_default()),
    ]
}

/// Sequences of admissible packets.
pub fn packet_sequence_strategy(
    config: FramingConfig,
    lengths: Range<usize>,
) -> impl Strategy<Value = Vec<CompletePacket>> {
    vec(packet_strategy(config), lengths)
}

/// Bytes that are never packet-type markers.
pub fn garbage_strategy(lengths: Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    vec(
        any::<u8>().prop_filter("not a packet marker", |byte| {
            PacketType::from_marker(*byte).is_none()
        }),
        lengths,
    )
}

/// Chunk sizes for splitting a stream, including single-byte delivery.
pub fn chunk_size_strategy(max: usize) -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), 1usize..=max.max(1)]
}
