//! Tokio codec adapter for HCI framing.
//!
//! [`HciCodec`] wraps a [`FrameDecoder`] so an async serial stream can be
//! framed with `tokio_util::codec::{FramedRead, FramedWrite, Framed}`.
//! Malformed input is handled the same way as in the byte-at-a-time path: the
//! in-flight packet is discarded and decoding resumes at the next marker, so
//! `decode` never returns a framing error.
//!
//! # End of stream
//!
//! A stream ending between packets is a clean close. A stream ending part way
//! through a packet yields an [`EofError`] converted to
//! [`io::ErrorKind::UnexpectedEof`].

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    config::FramingConfig,
    decoder::{DecodeState, DecoderStats, FrameDecoder},
    encoder::{encode_frame, encode_packet},
    error::EofError,
    packet::{CompletePacket, PacketType},
};

/// Codec framing [`CompletePacket`]s over a byte stream.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use hciframe::codec::HciCodec;
/// use tokio_util::codec::Decoder;
///
/// let mut codec = HciCodec::default();
/// let mut buf = BytesMut::from(&[0x04, 0x0E, 0x00, 0x01][..]);
/// let packet = codec.decode(&mut buf).expect("decode").expect("one packet");
/// assert_eq!(packet.header().payload_len(), 0);
/// // Bytes after the completed packet wait for the next call.
/// assert_eq!(buf.as_ref(), &[0x01]);
/// ```
#[derive(Debug, Default)]
pub struct HciCodec {
    decoder: FrameDecoder,
}

impl HciCodec {
    /// Construct a codec enforcing `config`.
    #[must_use]
    pub fn new(config: FramingConfig) -> Self {
        Self {
            decoder: FrameDecoder::new(config),
        }
    }

    /// Configuration in force.
    #[must_use]
    pub fn config(&self) -> &FramingConfig { self.decoder.config() }

    /// Running totals of the inner decoder.
    #[must_use]
    pub fn stats(&self) -> DecoderStats { self.decoder.stats() }
}

impl Decoder for HciCodec {
    type Item = CompletePacket;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.decoder.decode_next(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(packet) = self.decoder.decode_next(src) {
            return Ok(Some(packet));
        }
        match build_eof_error(&self.decoder) {
            None => Ok(None),
            Some(err) => {
                self.decoder.reset();
                Err(err.into())
            }
        }
    }
}

/// Describe where a stream ended, or `None` if it ended between packets.
fn build_eof_error(decoder: &FrameDecoder) -> Option<EofError> {
    match decoder.state() {
        DecodeState::AwaitingMarker => None,
        DecodeState::AccumulatingHeader => Some(EofError::MidHeader {
            bytes_received: decoder.in_flight_len(),
            header_size: decoder
                .in_flight_type()
                .and_then(PacketType::header_len)
                .unwrap_or_default(),
        }),
        DecodeState::AccumulatingPayload => Some(EofError::MidPacket {
            bytes_received: decoder.in_flight_len(),
            expected: decoder.expected_len().unwrap_or_default(),
        }),
    }
}

impl Encoder<CompletePacket> for HciCodec {
    type Error = io::Error;

    fn encode(&mut self, item: CompletePacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(&item, dst);
        Ok(())
    }
}

impl Encoder<&CompletePacket> for HciCodec {
    type Error = io::Error;

    fn encode(&mut self, item: &CompletePacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(item, dst);
        Ok(())
    }
}

/// Raw frame request: packet type plus pre-serialised header and payload.
impl<B: AsRef<[u8]>> Encoder<(PacketType, B)> for HciCodec {
    type Error = io::Error;

    fn encode(&mut self, item: (PacketType, B), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (packet_type, body) = item;
        encode_frame(packet_type, body.as_ref(), dst).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use bytes::BytesMut;
    use rstest::rstest;
    use tokio_util::codec::{Decoder, Encoder};

    use super::HciCodec;
    use crate::packet::{EventHeader, PacketHeader, PacketType};

    #[test]
    fn decode_returns_none_until_packet_complete() {
        let mut codec = HciCodec::default();
        let mut buf = BytesMut::from(&[0x04, 0x0E][..]);
        assert!(codec.decode(&mut buf).expect("decode").is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(&[0x01, 0x2A]);
        let packet = codec.decode(&mut buf).expect("decode").expect("packet");
        assert_eq!(
            packet.header(),
            &PacketHeader::Event(EventHeader::new(0x0E, 1))
        );
    }

    #[test]
    fn decode_skips_rejected_packets_without_error() {
        let mut codec = HciCodec::default();
        // Oversized ACL header followed by a valid event.
        let mut buf = BytesMut::from(&[0x02, 0x01, 0x00, 0xFF, 0x00, 0x04, 0x0E, 0x00][..]);
        let packet = codec.decode(&mut buf).expect("decode").expect("packet");
        assert_eq!(packet.packet_type(), PacketType::Event);
        assert_eq!(codec.stats().rejected, 1);
    }

    #[test]
    fn decode_eof_at_packet_boundary_is_clean() {
        let mut codec = HciCodec::default();
        let mut buf = BytesMut::from(&[0x00, 0x00][..]);
        assert!(codec.decode_eof(&mut buf).expect("clean close").is_none());
    }

    #[rstest]
    #[case::partial_header(&[0x02, 0x01][..], "header")]
    #[case::partial_payload(&[0x04, 0x0E, 0x10, 0x01, 0x02][..], "4 bytes of 18")]
    fn decode_eof_mid_packet_is_unexpected(#[case] bytes: &[u8], #[case] expected_substring: &str) {
        let mut codec = HciCodec::default();
        let mut buf = BytesMut::from(bytes);
        let err = codec.decode_eof(&mut buf).expect_err("premature EOF");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(
            err.to_string().contains(expected_substring),
            "error message should contain '{expected_substring}', got: {err}"
        );
    }

    #[test]
    fn raw_frame_encoding_rejects_synchronous_data() {
        let mut codec = HciCodec::default();
        let mut dst = BytesMut::new();
        let err = codec
            .encode((PacketType::SynchronousData, [0x01_u8, 0x00, 0x00]), &mut dst)
            .expect_err("SCO is not framed");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
