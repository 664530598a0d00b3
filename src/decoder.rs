//! Streaming HCI frame decoder.
//!
//! [`FrameDecoder`] consumes an unstructured byte stream one byte at a time and
//! reconstructs length-validated packets. It is a three-state machine:
//!
//! - [`DecodeState::AwaitingMarker`]: bytes are dropped until one is a packet-type marker.
//! - [`DecodeState::AccumulatingHeader`]: bytes fill the fixed header for the marker's type; once
//!   complete the declared length is checked against the configured bound.
//! - [`DecodeState::AccumulatingPayload`]: bytes fill the payload until the declared length is
//!   reached and the packet is emitted.
//!
//! Any malformed input discards the in-flight packet and returns the decoder
//! to [`DecodeState::AwaitingMarker`]. Nothing is escalated: the stream simply
//! realigns on the next marker. Results never depend on how the transport
//! batches bytes, because every call resumes exactly where the last one
//! stopped.
//!
//! The decoder is single-threaded. It takes `&mut self` for every byte, so
//! sharing one instance between producers requires the caller to serialise
//! delivery.

use std::io;

use bytes::{Buf, BufMut, BytesMut};

use crate::{
    config::FramingConfig,
    error::FramingError,
    metrics,
    packet::{CompletePacket, PacketHeader, PacketType},
    sink::PacketSink,
    source::{ByteSource, SourceRead},
};

/// Position of the decoder within the current packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeState {
    /// Waiting for a packet-type marker.
    #[default]
    AwaitingMarker,
    /// Filling the fixed-size header of the in-flight packet.
    AccumulatingHeader,
    /// Filling the payload of the in-flight packet.
    AccumulatingPayload,
}

/// Outcome of feeding one byte to [`FrameDecoder::push_byte`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The byte was not a marker and was dropped while resynchronising.
    Skipped,
    /// The byte was accumulated; the packet is not complete yet.
    Pending,
    /// The byte completed a packet.
    Complete(CompletePacket),
    /// The in-flight packet was discarded; the decoder awaits a new marker.
    Rejected(FramingError),
}

/// Running totals kept by a decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Packets emitted.
    pub packets: u64,
    /// In-flight packets discarded on rejection.
    pub rejected: u64,
    /// Non-marker bytes dropped while resynchronising.
    pub discarded_bytes: u64,
}

/// Decoder position, carrying what is known about the in-flight packet.
#[derive(Clone, Copy, Debug, Default)]
enum Phase {
    #[default]
    AwaitingMarker,
    Header {
        packet_type: PacketType,
        header_len: usize,
    },
    Payload {
        header: PacketHeader,
        /// Header plus declared payload length.
        expected_len: usize,
    },
}

/// Byte-at-a-time HCI packet decoder.
///
/// # Examples
///
/// ```
/// use hciframe::decoder::{FrameDecoder, Step};
///
/// let mut decoder = FrameDecoder::default();
/// // Garbage, then an Event packet: marker 0x04, code 0x0E, length 1, one byte.
/// let mut packets = Vec::new();
/// decoder.feed(&[0xFF, 0x00, 0x04, 0x0E, 0x01, 0x2A], &mut packets);
///
/// assert_eq!(packets.len(), 1);
/// assert_eq!(packets[0].payload().as_ref(), &[0x2A]);
/// assert_eq!(decoder.stats().discarded_bytes, 2);
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    config: FramingConfig,
    phase: Phase,
    /// Header and payload bytes received so far, marker excluded.
    body: BytesMut,
    stats: DecoderStats,
    skipped_run: u64,
}

impl FrameDecoder {
    /// Create a decoder enforcing the bounds in `config`.
    #[must_use]
    pub fn new(config: FramingConfig) -> Self {
        Self {
            config: config.normalised(),
            ..Self::default()
        }
    }

    /// Configuration in force.
    #[must_use]
    pub fn config(&self) -> &FramingConfig { &self.config }

    /// Current state-machine position.
    #[must_use]
    pub fn state(&self) -> DecodeState {
        match self.phase {
            Phase::AwaitingMarker => DecodeState::AwaitingMarker,
            Phase::Header { .. } => DecodeState::AccumulatingHeader,
            Phase::Payload { .. } => DecodeState::AccumulatingPayload,
        }
    }

    /// Packet type of the in-flight packet, if any.
    #[must_use]
    pub fn in_flight_type(&self) -> Option<PacketType> {
        match self.phase {
            Phase::AwaitingMarker => None,
            Phase::Header { packet_type, .. } => Some(packet_type),
            Phase::Payload { header, .. } => Some(header.packet_type()),
        }
    }

    /// Header and payload bytes accumulated for the in-flight packet.
    #[must_use]
    pub fn in_flight_len(&self) -> usize { self.body.len() }

    /// Header plus payload length of the in-flight packet, once its header
    /// has been validated.
    #[must_use]
    pub fn expected_len(&self) -> Option<usize> {
        match self.phase {
            Phase::Payload { expected_len, .. } => Some(expected_len),
            Phase::AwaitingMarker | Phase::Header { .. } => None,
        }
    }

    /// Running totals.
    #[must_use]
    pub fn stats(&self) -> DecoderStats { self.stats }

    /// Drop any in-flight packet and wait for the next marker.
    pub fn reset(&mut self) {
        self.body.clear();
        self.phase = Phase::AwaitingMarker;
        self.skipped_run = 0;
    }

    /// Advance the state machine by one byte.
    pub fn push_byte(&mut self, byte: u8) -> Step {
        match self.phase {
            Phase::AwaitingMarker => self.on_marker(byte),
            Phase::Header {
                packet_type,
                header_len,
            } => self.on_header_byte(packet_type, header_len, byte),
            Phase::Payload {
                header,
                expected_len,
            } => self.on_payload_byte(header, expected_len, byte),
        }
    }

    /// Decode every byte of `bytes`, dispatching each completed packet to
    /// `sink` before consuming the next byte.
    ///
    /// Returns the number of packets dispatched. Sink failures are logged and
    /// otherwise ignored.
    pub fn feed<S: PacketSink + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) -> usize {
        let mut dispatched = 0;
        for &byte in bytes {
            if let Step::Complete(packet) = self.push_byte(byte) {
                dispatch(sink, packet);
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Read from `source` until it reports no more data, dispatching each
    /// completed packet to `sink`.
    ///
    /// Returns the number of packets dispatched.
    ///
    /// # Errors
    ///
    /// Returns the source's error. Bytes already consumed stay applied, so the
    /// in-flight packet resumes on the next call.
    pub fn drain<R, S>(&mut self, source: &mut R, sink: &mut S) -> io::Result<usize>
    where
        R: ByteSource + ?Sized,
        S: PacketSink + ?Sized,
    {
        let mut dispatched = 0;
        while let SourceRead::Byte { byte, .. } = source.read_byte()? {
            if let Step::Complete(packet) = self.push_byte(byte) {
                dispatch(sink, packet);
                dispatched += 1;
            }
        }
        Ok(dispatched)
    }

    /// Consume bytes from `src` until one packet completes.
    ///
    /// Bytes after the completing byte are left in `src`. Returns `None` once
    /// `src` is exhausted without completing a packet.
    pub fn decode_next<B: Buf + ?Sized>(&mut self, src: &mut B) -> Option<CompletePacket> {
        while src.has_remaining() {
            if let Step::Complete(packet) = self.push_byte(src.get_u8()) {
                return Some(packet);
            }
        }
        None
    }

    fn on_marker(&mut self, byte: u8) -> Step {
        let Some(packet_type) = PacketType::from_marker(byte) else {
            self.skipped_run += 1;
            self.stats.discarded_bytes += 1;
            metrics::add_discarded(1);
            return Step::Skipped;
        };
        if self.skipped_run > 0 {
            tracing::debug!(
                dropped = self.skipped_run,
                marker = %packet_type,
                "resynchronised on packet marker"
            );
            self.skipped_run = 0;
        }
        let Some(header_len) = packet_type.header_len() else {
            return self.reject(FramingError::UnsupportedPacketType { packet_type });
        };
        self.body.clear();
        self.body.reserve(header_len);
        self.phase = Phase::Header {
            packet_type,
            header_len,
        };
        Step::Pending
    }

    fn on_header_byte(&mut self, packet_type: PacketType, header_len: usize, byte: u8) -> Step {
        if let Err(err) = self.append(packet_type, byte, self.config.max_packet_size()) {
            return self.reject(err);
        }
        if self.body.len() < header_len {
            return Step::Pending;
        }

        let header = match PacketHeader::parse(packet_type, &self.body) {
            Ok(header) => header,
            Err(err) => return self.reject(err),
        };
        let declared = header.payload_len();
        let max = self
            .config
            .max_payload_len(packet_type)
            .unwrap_or_default();
        if declared > max {
            return self.reject(FramingError::OversizedPayload {
                packet_type,
                declared,
                max,
            });
        }

        if declared == 0 {
            return self.complete(header);
        }
        self.body.reserve(declared);
        self.phase = Phase::Payload {
            header,
            expected_len: header_len + declared,
        };
        Step::Pending
    }

    fn on_payload_byte(&mut self, header: PacketHeader, expected_len: usize, byte: u8) -> Step {
        if let Err(err) = self.append(header.packet_type(), byte, expected_len) {
            return self.reject(err);
        }
        if self.body.len() == expected_len {
            return self.complete(header);
        }
        Step::Pending
    }

    /// Append one byte, refusing to grow the body past `capacity`.
    fn append(
        &mut self,
        packet_type: PacketType,
        byte: u8,
        capacity: usize,
    ) -> Result<(), FramingError> {
        if self.body.len() >= capacity {
            return Err(FramingError::OversizedPayload {
                packet_type,
                declared: self.body.len() + 1,
                max: capacity,
            });
        }
        self.body.put_u8(byte);
        Ok(())
    }

    fn complete(&mut self, header: PacketHeader) -> Step {
        let body = self.body.split();
        self.phase = Phase::AwaitingMarker;

        let packet = CompletePacket::from_parts(header, body);
        self.stats.packets += 1;
        metrics::inc_decoded(packet.packet_type());
        tracing::trace!(
            packet_type = %packet.packet_type(),
            len = packet.len(),
            "packet framed"
        );
        Step::Complete(packet)
    }

    fn reject(&mut self, err: FramingError) -> Step {
        tracing::debug!(
            reason = err.reason(),
            error = %err,
            discarded = self.body.len() + 1,
            "discarding in-flight packet"
        );
        self.stats.rejected += 1;
        metrics::inc_rejected(&err);
        self.body.clear();
        self.phase = Phase::AwaitingMarker;
        Step::Rejected(err)
    }
}

/// Hand `packet` to `sink`, logging a failure without acting on it.
pub(crate) fn dispatch<S: PacketSink + ?Sized>(sink: &mut S, packet: CompletePacket) {
    let packet_type = packet.packet_type();
    if let Err(err) = sink.receive(packet) {
        tracing::warn!(%packet_type, error = %err, "packet sink reported failure");
    }
}
