//! Upper-layer seams: the dispatch sink for decoded packets and the
//! transmitter for encoded ones.
//!
//! Both are fire-and-forget from the framing layer's point of view. A sink's
//! error is logged and otherwise ignored by the decoder; a transmitter has no
//! result at all.

use std::{convert::Infallible, fmt};

use bytes::Bytes;

use crate::packet::{CompletePacket, PacketType};

/// Receiver of fully framed packets.
///
/// Called synchronously once per packet; the decoder does not consume the next
/// byte until `receive` returns, so a slow sink back-pressures the byte source.
///
/// # Examples
///
/// ```
/// use hciframe::{decoder::FrameDecoder, packet::CompletePacket};
///
/// let mut seen = Vec::new();
/// let mut sink = |packet: CompletePacket| -> Result<(), std::convert::Infallible> {
///     seen.push(packet.packet_type());
///     Ok(())
/// };
/// let mut decoder = FrameDecoder::default();
/// decoder.feed(&[0x04, 0x0E, 0x00], &mut sink);
/// assert_eq!(seen.len(), 1);
/// ```
pub trait PacketSink {
    /// Failure reported by the sink.
    type Error: fmt::Display;

    /// Take ownership of one framed packet.
    ///
    /// # Errors
    ///
    /// Implementations may report a failure; the decoder logs it and carries
    /// on with the next marker.
    fn receive(&mut self, packet: CompletePacket) -> Result<(), Self::Error>;
}

impl<F, E> PacketSink for F
where
    F: FnMut(CompletePacket) -> Result<(), E>,
    E: fmt::Display,
{
    type Error = E;

    fn receive(&mut self, packet: CompletePacket) -> Result<(), Self::Error> { self(packet) }
}

impl PacketSink for Vec<CompletePacket> {
    type Error = Infallible;

    fn receive(&mut self, packet: CompletePacket) -> Result<(), Self::Error> {
        self.push(packet);
        Ok(())
    }
}

/// Writer handing framed bytes to the underlying transport.
pub trait PacketTransmitter {
    /// Transmit one wire-ready frame: marker, header, and payload.
    fn send(&mut self, packet_type: PacketType, frame: Bytes);
}

impl<F> PacketTransmitter for F
where
    F: FnMut(PacketType, Bytes),
{
    fn send(&mut self, packet_type: PacketType, frame: Bytes) { self(packet_type, frame) }
}

impl PacketTransmitter for Vec<Bytes> {
    fn send(&mut self, _packet_type: PacketType, frame: Bytes) { self.push(frame); }
}
