//! HCI transport wiring.
//!
//! [`HciTransport`] owns one [`FrameDecoder`] together with the upper-layer
//! [`PacketSink`] and the outbound [`PacketTransmitter`]. Each physical link
//! gets its own transport instance; nothing here is global.
//!
//! Inbound bytes arrive through [`HciTransport::on_rx`] (a byte source being
//! drained, as from a serial receive callback) or
//! [`HciTransport::receive_bytes`] (a chunk already in memory). Lower layers
//! that deliver whole packets use [`HciTransport::recv_packet`]. Outbound
//! packets are framed and handed to the transmitter by
//! [`HciTransport::send_packet`] and [`HciTransport::send`].
//!
//! For async byte streams, [`drive_reader`] frames an `AsyncRead` with
//! [`HciCodec`] and dispatches each packet until end of stream.

use std::io;

use futures::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::{
    codec::HciCodec,
    config::FramingConfig,
    decoder::{FrameDecoder, dispatch},
    encoder::{frame_bytes, packet_bytes},
    error::{FramingError, TransportError},
    packet::{CompletePacket, PacketType},
    sink::{PacketSink, PacketTransmitter},
    source::ByteSource,
};

/// One HCI link: a decoder, the sink it dispatches to, and the transmitter
/// outbound frames are written to.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use hciframe::{
///     config::FramingConfig,
///     packet::{CompletePacket, PacketType},
///     transport::HciTransport,
/// };
///
/// let mut transport = HciTransport::new(
///     FramingConfig::default(),
///     Vec::<CompletePacket>::new(),
///     Vec::<Bytes>::new(),
/// );
///
/// // Controller to host: a Command Complete event arrives in two chunks.
/// transport.receive_bytes(&[0x04, 0x0E, 0x04]);
/// transport.receive_bytes(&[0x01, 0x03, 0x0C, 0x00]);
/// assert_eq!(transport.sink().len(), 1);
///
/// // Host to controller: HCI_Reset.
/// transport
///     .send_packet(PacketType::Command, &[0x03, 0x0C, 0x00])
///     .expect("command frames");
/// assert_eq!(transport.transmitter()[0].as_ref(), &[0x01, 0x03, 0x0C, 0x00]);
/// ```
#[derive(Debug)]
pub struct HciTransport<S, T> {
    decoder: FrameDecoder,
    sink: S,
    transmitter: T,
}

impl<S, T> HciTransport<S, T>
where
    S: PacketSink,
    T: PacketTransmitter,
{
    /// Wire a new decoder between `sink` and `transmitter`.
    #[must_use]
    pub fn new(config: FramingConfig, sink: S, transmitter: T) -> Self {
        Self {
            decoder: FrameDecoder::new(config),
            sink,
            transmitter,
        }
    }

    /// Drain `source`, dispatching every packet it completes.
    ///
    /// Returns the number of packets dispatched. Stops when the source
    /// reports no more data; a partial packet stays in flight until the next
    /// delivery.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Source`] if the source fails. Bytes consumed
    /// before the failure remain applied.
    pub fn on_rx<R: ByteSource + ?Sized>(&mut self, source: &mut R) -> Result<usize, TransportError> {
        Ok(self.decoder.drain(source, &mut self.sink)?)
    }

    /// Decode an in-memory chunk, dispatching every packet it completes.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> usize {
        self.decoder.feed(bytes, &mut self.sink)
    }

    /// Dispatch one pre-framed packet: marker byte, header, then payload.
    ///
    /// Bypasses the streaming decoder, so it does not disturb a packet that
    /// is in flight there.
    ///
    /// # Errors
    ///
    /// - [`TransportError::EmptyPacket`] if `raw` is empty.
    /// - [`TransportError::UnknownPacketType`] if the first byte is not a Command, ACL data, or
    ///   Event marker.
    /// - [`TransportError::Framing`] if the header disagrees with the body length or declares more
    ///   payload than the configuration allows.
    /// - [`TransportError::Dispatch`] if the sink reports failure.
    pub fn recv_packet(&mut self, raw: &[u8]) -> Result<(), TransportError> {
        let (&marker, body) = raw.split_first().ok_or(TransportError::EmptyPacket)?;
        let packet_type = PacketType::from_marker(marker)
            .filter(|packet_type| packet_type.is_supported())
            .ok_or(TransportError::UnknownPacketType { byte: marker })?;
        let packet = CompletePacket::from_body(packet_type, body)?;

        let declared = packet.header().payload_len();
        let max = self
            .decoder
            .config()
            .max_payload_len(packet_type)
            .unwrap_or_default();
        if declared > max {
            return Err(FramingError::OversizedPayload {
                packet_type,
                declared,
                max,
            }
            .into());
        }

        self.sink
            .receive(packet)
            .map_err(|err| TransportError::Dispatch(err.to_string()))
    }

    /// Frame a pre-serialised body and hand it to the transmitter.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::UnsupportedPacketType`] for synchronous data.
    pub fn send_packet(&mut self, packet_type: PacketType, body: &[u8]) -> Result<(), FramingError> {
        let frame = frame_bytes(packet_type, body)?;
        tracing::trace!(%packet_type, len = frame.len(), "transmitting frame");
        self.transmitter.send(packet_type, frame);
        Ok(())
    }

    /// Frame a structured packet and hand it to the transmitter.
    pub fn send(&mut self, packet: &CompletePacket) {
        let packet_type = packet.packet_type();
        let frame = packet_bytes(packet);
        tracing::trace!(%packet_type, len = frame.len(), "transmitting frame");
        self.transmitter.send(packet_type, frame);
    }

    /// The streaming decoder.
    #[must_use]
    pub fn decoder(&self) -> &FrameDecoder { &self.decoder }

    /// Discard any partially received packet, for example after a link reset.
    pub fn reset(&mut self) { self.decoder.reset(); }

    /// The dispatch sink.
    #[must_use]
    pub fn sink(&self) -> &S { &self.sink }

    /// Mutable access to the dispatch sink.
    pub fn sink_mut(&mut self) -> &mut S { &mut self.sink }

    /// The transmitter.
    #[must_use]
    pub fn transmitter(&self) -> &T { &self.transmitter }

    /// Take the sink and transmitter back.
    #[must_use]
    pub fn into_parts(self) -> (S, T) { (self.sink, self.transmitter) }
}

/// Frame `reader` until end of stream, dispatching every packet to `sink`.
///
/// Returns the number of packets dispatched.
///
/// # Errors
///
/// Returns read errors from `reader`, and an
/// [`io::ErrorKind::UnexpectedEof`] error if the stream ends part way
/// through a packet.
pub async fn drive_reader<R, S>(
    reader: R,
    config: FramingConfig,
    sink: &mut S,
) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    S: PacketSink + ?Sized,
{
    let mut framed = FramedRead::new(reader, HciCodec::new(config));
    let mut dispatched = 0;
    while let Some(packet) = framed.try_next().await? {
        dispatch(sink, packet);
        dispatched += 1;
    }
    tracing::debug!(dispatched, stats = ?framed.decoder().stats(), "reader reached end of stream");
    Ok(dispatched)
}
