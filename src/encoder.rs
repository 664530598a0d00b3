//! Stateless HCI frame encoder.
//!
//! Framing a packet means prefixing its body (header plus payload) with the
//! packet-type marker. The encoder does not inspect payload semantics; it only
//! guarantees the marker and the header field layout match what
//! [`FrameDecoder`](crate::decoder::FrameDecoder) expects.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    error::FramingError,
    metrics,
    packet::{CompletePacket, PacketType},
};

/// Marker byte length prepended to every frame.
pub const MARKER_LEN: usize = 1;

/// Append the frame for `packet_type` and a pre-serialised `body` to `dst`.
///
/// The caller guarantees the header inside `body` already matches its payload
/// length.
///
/// # Errors
///
/// Returns [`FramingError::UnsupportedPacketType`] for synchronous data, which
/// the decoder would never frame.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use hciframe::{encoder::encode_frame, packet::PacketType};
///
/// let mut dst = BytesMut::new();
/// encode_frame(PacketType::Command, &[0x03, 0x0C, 0x00], &mut dst).expect("command frames");
/// assert_eq!(dst.as_ref(), &[0x01, 0x03, 0x0C, 0x00]);
/// ```
pub fn encode_frame(
    packet_type: PacketType,
    body: &[u8],
    dst: &mut BytesMut,
) -> Result<(), FramingError> {
    if !packet_type.is_supported() {
        return Err(FramingError::UnsupportedPacketType { packet_type });
    }
    dst.reserve(MARKER_LEN + body.len());
    dst.put_u8(packet_type.marker());
    dst.put_slice(body);
    metrics::inc_encoded(packet_type);
    Ok(())
}

/// Append the frame for a structured packet to `dst`, writing each header
/// field explicitly.
pub fn encode_packet(packet: &CompletePacket, dst: &mut BytesMut) {
    let packet_type = packet.packet_type();
    dst.reserve(MARKER_LEN + packet.len());
    dst.put_u8(packet_type.marker());
    packet.write_body(dst);
    metrics::inc_encoded(packet_type);
}

/// Frame `body` into a fresh buffer.
///
/// # Errors
///
/// See [`encode_frame`].
pub fn frame_bytes(packet_type: PacketType, body: &[u8]) -> Result<Bytes, FramingError> {
    let mut dst = BytesMut::with_capacity(MARKER_LEN + body.len());
    encode_frame(packet_type, body, &mut dst)?;
    Ok(dst.freeze())
}

/// Frame a structured packet into a fresh buffer.
#[must_use]
pub fn packet_bytes(packet: &CompletePacket) -> Bytes {
    let mut dst = BytesMut::with_capacity(MARKER_LEN + packet.len());
    encode_packet(packet, &mut dst);
    dst.freeze()
}

#[cfg(test)]
mod tests {
    use bytes::{Bytes, BytesMut};
    use rstest::rstest;

    use super::*;
    use crate::{
        decoder::FrameDecoder,
        packet::{AclDataHeader, CommandHeader, EventHeader, PacketHeader},
    };

    #[test]
    fn synchronous_data_is_not_framed() {
        let mut dst = BytesMut::new();
        assert_eq!(
            encode_frame(PacketType::SynchronousData, &[0x01, 0x00, 0x00], &mut dst),
            Err(FramingError::UnsupportedPacketType {
                packet_type: PacketType::SynchronousData
            })
        );
        assert!(dst.is_empty());
    }

    #[test]
    fn frames_append_to_existing_buffer() {
        let mut dst = BytesMut::from(&[0xEE][..]);
        encode_frame(PacketType::Event, &[0x0E, 0x00], &mut dst).expect("event frames");
        assert_eq!(dst.as_ref(), &[0xEE, 0x04, 0x0E, 0x00]);
    }

    #[rstest]
    #[case::command(CommandHeader::new(0x0C03, 2).into(), &[0x01, 0x02][..])]
    #[case::acl(
        AclDataHeader::new(0x0123, 0b10, 0b00, 3).expect("valid header").into(),
        &[0xA, 0xB, 0xC][..]
    )]
    #[case::event(EventHeader::new(0x3E, 1).into(), &[0x02][..])]
    fn encoded_packets_decode_to_themselves(#[case] header: PacketHeader, #[case] payload: &[u8]) {
        let packet =
            CompletePacket::new(header, Bytes::copy_from_slice(payload)).expect("valid packet");
        let wire = packet_bytes(&packet);
        assert_eq!(wire[0], header.packet_type().marker());
        assert_eq!(wire.len(), MARKER_LEN + header.len() + payload.len());

        let mut decoded = Vec::new();
        FrameDecoder::default().feed(&wire, &mut decoded);
        assert_eq!(decoded, vec![packet.clone()]);

        let raw = frame_bytes(packet.packet_type(), &packet.body()).expect("framed");
        assert_eq!(raw, wire);
    }
}
