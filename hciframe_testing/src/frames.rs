//! Raw frame builders and decoding drivers.
//!
//! Frames are assembled from literal bytes so tests can check the decoder and
//! encoder against an independent layout.

use hciframe::{CompletePacket, FrameDecoder, FramingConfig};

/// Marker, little-endian opcode, parameter length, then `params`.
///
/// # Panics
///
/// Panics if `params` is longer than 255 bytes.
#[must_use]
pub fn command_frame(opcode: u16, params: &[u8]) -> Vec<u8> {
    let len = u8::try_from(params.len()).expect("command parameters fit in u8");
    let [lo, hi] = opcode.to_le_bytes();
    let mut frame = vec![0x01, lo, hi, len];
    frame.extend_from_slice(params);
    frame
}

/// Marker, packed handle and flags, little-endian length, then `data`.
///
/// # Panics
///
/// Panics if `data` is longer than `u16::MAX` bytes.
#[must_use]
pub fn acl_frame(handle: u16, pb_flag: u8, bc_flag: u8, data: &[u8]) -> Vec<u8> {
    let len = u16::try_from(data.len()).expect("ACL data fits in u16");
    let mut frame = acl_header_only(handle, pb_flag, bc_flag, len);
    frame.extend_from_slice(data);
    frame
}

/// ACL marker and header declaring `declared` bytes, with no data following.
#[must_use]
pub fn acl_header_only(handle: u16, pb_flag: u8, bc_flag: u8, declared: u16) -> Vec<u8> {
    let word = (handle & 0x0FFF)
        | (u16::from(pb_flag & 0b11) << 12)
        | (u16::from(bc_flag & 0b11) << 14);
    let [w_lo, w_hi] = word.to_le_bytes();
    let [l_lo, l_hi] = declared.to_le_bytes();
    vec![0x02, w_lo, w_hi, l_lo, l_hi]
}

/// Marker, event code, parameter length, then `params`.
///
/// # Panics
///
/// Panics if `params` is longer than 255 bytes.
#[must_use]
pub fn event_frame(code: u8, params: &[u8]) -> Vec<u8> {
    let len = u8::try_from(params.len()).expect("event parameters fit in u8");
    let mut frame = vec![0x04, code, len];
    frame.extend_from_slice(params);
    frame
}

/// Decode `bytes` in one call with the default configuration.
#[must_use]
pub fn decode_all(bytes: &[u8]) -> Vec<CompletePacket> { decode_in_chunks(bytes, bytes.len().max(1)) }

/// Decode `bytes` with the default configuration, `chunk_size` bytes per call.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
#[must_use]
pub fn decode_in_chunks(bytes: &[u8], chunk_size: usize) -> Vec<CompletePacket> {
    decode_in_chunks_with(FramingConfig::default(), bytes, chunk_size)
}

/// Decode `bytes` with `config`, `chunk_size` bytes per call.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
#[must_use]
pub fn decode_in_chunks_with(
    config: FramingConfig,
    bytes: &[u8],
    chunk_size: usize,
) -> Vec<CompletePacket> {
    let mut decoder = FrameDecoder::new(config);
    let mut packets = Vec::new();
    for chunk in bytes.chunks(chunk_size) {
        decoder.feed(chunk, &mut packets);
    }
    packets
}
