//! Recording implementations of the transport's upper-layer seams.

use std::fmt;

use bytes::Bytes;
use hciframe::{CompletePacket, PacketSink, PacketTransmitter, PacketType};

/// Failure reported by a [`RecordingSink`] configured to reject packets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkFailure(pub PacketType);

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink refused {} packet", self.0)
    }
}

impl std::error::Error for SinkFailure {}

/// Sink that keeps every packet it receives.
///
/// Packets whose type is listed in `reject` are still recorded, then reported
/// as failures.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Packets received, in order.
    pub packets: Vec<CompletePacket>,
    /// Packet types answered with [`SinkFailure`].
    pub reject: Vec<PacketType>,
}

impl RecordingSink {
    /// Sink that fails every packet of `packet_type`.
    #[must_use]
    pub fn rejecting(packet_type: PacketType) -> Self {
        Self {
            packets: Vec::new(),
            reject: vec![packet_type],
        }
    }

    /// Types of the packets received, in order.
    #[must_use]
    pub fn types(&self) -> Vec<PacketType> {
        self.packets.iter().map(CompletePacket::packet_type).collect()
    }
}

impl PacketSink for RecordingSink {
    type Error = SinkFailure;

    fn receive(&mut self, packet: CompletePacket) -> Result<(), Self::Error> {
        let packet_type = packet.packet_type();
        self.packets.push(packet);
        if self.reject.contains(&packet_type) {
            return Err(SinkFailure(packet_type));
        }
        Ok(())
    }
}

/// Transmitter that keeps every frame handed to it.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    /// Frames sent, with the type they were tagged with.
    pub frames: Vec<(PacketType, Bytes)>,
}

impl RecordingTransmitter {
    /// Concatenation of every frame sent, as it would appear on the wire.
    #[must_use]
    pub fn wire(&self) -> Vec<u8> {
        self.frames
            .iter()
            .flat_map(|(_, frame)| frame.iter().copied())
            .collect()
    }
}

impl PacketTransmitter for RecordingTransmitter {
    fn send(&mut self, packet_type: PacketType, frame: Bytes) { self.frames.push((packet_type, frame)); }
}
