//! Generated checks for the frame decoder and encoder.
//!
//! Packets are generated within the configured bounds, encoded, and decoded
//! back under varying chunk sizes and noisy prefixes.

use bytes::BytesMut;
use hciframe::{FrameDecoder, FramingConfig, encode_packet};
use hciframe_testing::{
    chunk_size_strategy,
    decode_in_chunks_with,
    deterministic_runner,
    garbage_strategy,
    packet_sequence_strategy,
    packet_strategy,
};
use proptest::{prop_assert, prop_assert_eq};
use rstest::rstest;

fn config_with_acl(max_acl: u16) -> FramingConfig {
    FramingConfig::default()
        .with_max_packet_size(usize::from(max_acl) + 4)
        .with_max_acl_data_length(max_acl)
}

#[rstest]
#[case::le_default(27, 96)]
#[case::le_extended(251, 64)]
#[case::large(1021, 32)]
fn generated_sequences_round_trip(#[case] max_acl: u16, #[case] cases: u32) {
    let config = config_with_acl(max_acl);
    let mut runner = deterministic_runner(cases);
    let strategy = packet_sequence_strategy(config, 1..12);

    runner
        .run(&strategy, |packets| {
            let mut wire = BytesMut::new();
            for packet in &packets {
                encode_packet(packet, &mut wire);
            }

            let mut decoder = FrameDecoder::new(config);
            let mut decoded = Vec::new();
            decoder.feed(&wire, &mut decoded);

            prop_assert_eq!(&decoded, &packets);
            prop_assert_eq!(decoder.stats().rejected, 0);
            prop_assert_eq!(decoder.stats().discarded_bytes, 0);
            Ok(())
        })
        .expect("generated packet sequences should round-trip");
}

#[rstest]
#[case::le_default(27, 96)]
#[case::le_extended(251, 48)]
fn chunk_size_never_changes_decoded_packets(#[case] max_acl: u16, #[case] cases: u32) {
    let config = config_with_acl(max_acl);
    let mut runner = deterministic_runner(cases);
    let strategy = (
        packet_sequence_strategy(config, 1..8),
        chunk_size_strategy(64),
    );

    runner
        .run(&strategy, |(packets, chunk_size)| {
            let mut wire = BytesMut::new();
            for packet in &packets {
                encode_packet(packet, &mut wire);
            }

            let whole = decode_in_chunks_with(config, &wire, wire.len().max(1));
            let chunked = decode_in_chunks_with(config, &wire, chunk_size);
            let single = decode_in_chunks_with(config, &wire, 1);

            prop_assert_eq!(&chunked, &whole);
            prop_assert_eq!(&single, &whole);
            prop_assert_eq!(whole.len(), packets.len());
            Ok(())
        })
        .expect("chunking should not affect framing");
}

#[rstest]
#[case(128)]
fn garbage_prefix_yields_exactly_one_packet(#[case] cases: u32) {
    let config = FramingConfig::default();
    let mut runner = deterministic_runner(cases);
    let strategy = (garbage_strategy(0..64), packet_strategy(config));

    runner
        .run(&strategy, |(garbage, packet)| {
            let mut wire = BytesMut::from(garbage.as_slice());
            encode_packet(&packet, &mut wire);

            let mut decoder = FrameDecoder::new(config);
            let mut decoded = Vec::new();
            let dispatched = decoder.feed(&wire, &mut decoded);

            prop_assert_eq!(dispatched, 1);
            prop_assert_eq!(&decoded[0], &packet);
            prop_assert_eq!(
                decoder.stats().discarded_bytes,
                u64::try_from(garbage.len()).unwrap_or(u64::MAX)
            );
            prop_assert!(decoder.in_flight_len() == 0);
            Ok(())
        })
        .expect("garbage prefix should be skipped");
}
