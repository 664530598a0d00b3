//! HCI packet model.
//!
//! Every framed packet starts with a one-byte [`PacketType`] marker followed
//! by a fixed-size header whose layout depends on the type, then the payload
//! the header declares. [`PacketHeader`] is a tagged enum over the three
//! supported layouts and (de)serialises each field explicitly.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FramingError;

mod header;

pub use header::{
    ACL_HANDLE_MAX,
    AclDataHeader,
    BROADCAST_FLAG_MAX,
    CommandHeader,
    EventHeader,
    MAX_HEADER_LEN,
    PACKET_BOUNDARY_FLAG_MAX,
    PacketHeader,
};

/// HCI packet type, carried on the wire as the marker byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Host to controller command.
    Command = 0x01,
    /// Asynchronous connection-oriented data.
    AclData = 0x02,
    /// Synchronous (SCO/eSCO) data. Recognised but never framed.
    SynchronousData = 0x03,
    /// Controller to host event.
    Event = 0x04,
}

impl PacketType {
    /// Map a marker byte to its packet type.
    ///
    /// # Examples
    ///
    /// ```
    /// use hciframe::packet::PacketType;
    ///
    /// assert_eq!(PacketType::from_marker(0x04), Some(PacketType::Event));
    /// assert_eq!(PacketType::from_marker(0x05), None);
    /// ```
    #[must_use]
    pub const fn from_marker(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Command),
            0x02 => Some(Self::AclData),
            0x03 => Some(Self::SynchronousData),
            0x04 => Some(Self::Event),
            _ => None,
        }
    }

    /// The marker byte written before the header.
    #[must_use]
    pub const fn marker(self) -> u8 { self as u8 }

    /// Size of the fixed header, or `None` for types this layer does not frame.
    #[must_use]
    pub const fn header_len(self) -> Option<usize> {
        match self {
            Self::Command => Some(CommandHeader::LEN),
            Self::AclData => Some(AclDataHeader::LEN),
            Self::Event => Some(EventHeader::LEN),
            Self::SynchronousData => None,
        }
    }

    /// Whether the decoder and encoder frame this packet type.
    #[must_use]
    pub const fn is_supported(self) -> bool { self.header_len().is_some() }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::AclData => "acl_data",
            Self::SynchronousData => "synchronous_data",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl TryFrom<u8> for PacketType {
    type Error = FramingError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_marker(byte).ok_or(FramingError::UnrecognisedMarker { byte })
    }
}

/// A fully assembled packet: header fields plus the payload they describe.
///
/// The marker byte is not stored; it is implied by the header variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletePacket {
    header: PacketHeader,
    payload: Bytes,
}

impl CompletePacket {
    /// Build a packet, checking the header's declared length against the payload.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::LengthMismatch`] if the header declares a
    /// different payload length than `payload` carries.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use hciframe::packet::{CommandHeader, CompletePacket, PacketType};
    ///
    /// let header = CommandHeader::new(0x0C03, 0);
    /// let packet = CompletePacket::new(header.into(), Bytes::new()).expect("lengths agree");
    /// assert_eq!(packet.packet_type(), PacketType::Command);
    /// assert_eq!(packet.body().as_ref(), &[0x03, 0x0C, 0x00]);
    /// ```
    pub fn new(header: PacketHeader, payload: Bytes) -> Result<Self, FramingError> {
        let declared = header.payload_len();
        if declared != payload.len() {
            return Err(FramingError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }
        Ok(Self { header, payload })
    }

    /// Parse a packet from its body: header bytes followed by the payload,
    /// without the marker.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::UnsupportedPacketType`] for synchronous data,
    /// [`FramingError::Truncated`] if the body is shorter than the header, and
    /// [`FramingError::LengthMismatch`] if the remaining bytes disagree with the
    /// declared payload length.
    pub fn from_body(packet_type: PacketType, body: &[u8]) -> Result<Self, FramingError> {
        let header_len = packet_type
            .header_len()
            .ok_or(FramingError::UnsupportedPacketType { packet_type })?;
        let (header_bytes, payload) = body
            .split_at_checked(header_len)
            .ok_or(FramingError::Truncated {
                have: body.len(),
                need: header_len,
            })?;
        let header = PacketHeader::parse(packet_type, header_bytes)?;
        Self::new(header, Bytes::copy_from_slice(payload))
    }

    /// Assemble a packet from a decoder-owned body buffer.
    ///
    /// The caller has already validated the header and the body length.
    pub(crate) fn from_parts(header: PacketHeader, mut body: BytesMut) -> Self {
        let payload = body.split_off(header.len()).freeze();
        Self { header, payload }
    }

    /// Packet type implied by the header.
    #[must_use]
    pub fn packet_type(&self) -> PacketType { self.header.packet_type() }

    /// Parsed header fields.
    #[must_use]
    pub fn header(&self) -> &PacketHeader { &self.header }

    /// Payload bytes following the header.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Consume the packet and return its header and payload.
    #[must_use]
    pub fn into_parts(self) -> (PacketHeader, Bytes) { (self.header, self.payload) }

    /// Header plus payload length, excluding the marker.
    #[must_use]
    pub fn len(&self) -> usize { self.header.len() + self.payload.len() }

    /// Always false: every packet carries at least its header.
    #[must_use]
    pub fn is_empty(&self) -> bool { false }

    /// Serialise header and payload, without the marker.
    #[must_use]
    pub fn body(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.len());
        self.write_body(&mut dst);
        dst.freeze()
    }

    pub(crate) fn write_body<B: BufMut>(&self, dst: &mut B) {
        self.header.write(dst);
        dst.put_slice(&self.payload);
    }
}

#[cfg(test)]
mod tests;
