//! Fixed-size header layouts for each framed packet type.

use bytes::BufMut;

use super::PacketType;
use crate::{
    byte_order::{read_hci_u16, write_hci_u16},
    error::{FramingError, HeaderError},
};

/// Largest fixed header across all framed packet types.
pub const MAX_HEADER_LEN: usize = AclDataHeader::LEN;

/// Largest connection handle representable in 12 bits.
pub const ACL_HANDLE_MAX: u16 = 0x0FFF;
/// Largest packet-boundary flag representable in 2 bits.
pub const PACKET_BOUNDARY_FLAG_MAX: u8 = 0b11;
/// Largest broadcast flag representable in 2 bits.
pub const BROADCAST_FLAG_MAX: u8 = 0b11;

const PB_FLAG_SHIFT: u16 = 12;
const BC_FLAG_SHIFT: u16 = 14;

/// Command header: opcode and parameter length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandHeader {
    /// Command opcode (OGF in the top 6 bits, OCF in the low 10).
    pub opcode: u16,
    /// Number of parameter bytes following the header.
    pub parameter_total_length: u8,
}

impl CommandHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 3;

    /// Build a command header.
    #[must_use]
    pub const fn new(opcode: u16, parameter_total_length: u8) -> Self {
        Self {
            opcode,
            parameter_total_length,
        }
    }

    fn parse(bytes: [u8; Self::LEN]) -> Self {
        let [op_lo, op_hi, len] = bytes;
        Self {
            opcode: read_hci_u16([op_lo, op_hi]),
            parameter_total_length: len,
        }
    }

    fn write<B: BufMut>(self, dst: &mut B) {
        dst.put_slice(&write_hci_u16(self.opcode));
        dst.put_u8(self.parameter_total_length);
    }
}

/// ACL data header: packed handle and flags, then data length.
///
/// The first 16-bit word carries the connection handle in bits 0..=11, the
/// packet-boundary flag in bits 12..=13 and the broadcast flag in bits 14..=15.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AclDataHeader {
    handle: u16,
    packet_boundary_flag: u8,
    broadcast_flag: u8,
    data_total_length: u16,
}

impl AclDataHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 4;

    /// Build an ACL header, checking each packed field fits its bit width.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::FieldOutOfRange`] if the handle exceeds 12 bits
    /// or either flag exceeds 2 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use hciframe::packet::AclDataHeader;
    ///
    /// let header = AclDataHeader::new(0x0001, 0b10, 0b00, 27).expect("fields fit");
    /// assert_eq!(header.handle(), 0x0001);
    /// assert!(AclDataHeader::new(0x1000, 0, 0, 0).is_err());
    /// ```
    pub fn new(
        handle: u16,
        packet_boundary_flag: u8,
        broadcast_flag: u8,
        data_total_length: u16,
    ) -> Result<Self, HeaderError> {
        check_field("handle", handle, ACL_HANDLE_MAX)?;
        check_field(
            "packet_boundary_flag",
            u16::from(packet_boundary_flag),
            u16::from(PACKET_BOUNDARY_FLAG_MAX),
        )?;
        check_field(
            "broadcast_flag",
            u16::from(broadcast_flag),
            u16::from(BROADCAST_FLAG_MAX),
        )?;
        Ok(Self {
            handle,
            packet_boundary_flag,
            broadcast_flag,
            data_total_length,
        })
    }

    /// Connection handle (12 bits).
    #[must_use]
    pub const fn handle(&self) -> u16 { self.handle }

    /// Packet-boundary flag (2 bits).
    #[must_use]
    pub const fn packet_boundary_flag(&self) -> u8 { self.packet_boundary_flag }

    /// Broadcast flag (2 bits).
    #[must_use]
    pub const fn broadcast_flag(&self) -> u8 { self.broadcast_flag }

    /// Number of data bytes following the header.
    #[must_use]
    pub const fn data_total_length(&self) -> u16 { self.data_total_length }

    fn parse(bytes: [u8; Self::LEN]) -> Self {
        let [w_lo, w_hi, len_lo, len_hi] = bytes;
        let word = read_hci_u16([w_lo, w_hi]);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "flags are masked to 2 bits before narrowing"
        )]
        let (packet_boundary_flag, broadcast_flag) = (
            ((word >> PB_FLAG_SHIFT) & u16::from(PACKET_BOUNDARY_FLAG_MAX)) as u8,
            ((word >> BC_FLAG_SHIFT) & u16::from(BROADCAST_FLAG_MAX)) as u8,
        );
        Self {
            handle: word & ACL_HANDLE_MAX,
            packet_boundary_flag,
            broadcast_flag,
            data_total_length: read_hci_u16([len_lo, len_hi]),
        }
    }

    fn write<B: BufMut>(self, dst: &mut B) {
        let word = (self.handle & ACL_HANDLE_MAX)
            | (u16::from(self.packet_boundary_flag & PACKET_BOUNDARY_FLAG_MAX) << PB_FLAG_SHIFT)
            | (u16::from(self.broadcast_flag & BROADCAST_FLAG_MAX) << BC_FLAG_SHIFT);
        dst.put_slice(&write_hci_u16(word));
        dst.put_slice(&write_hci_u16(self.data_total_length));
    }
}

fn check_field(field: &'static str, value: u16, max: u16) -> Result<(), HeaderError> {
    if value > max {
        return Err(HeaderError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}

/// Event header: event code and parameter length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventHeader {
    /// Event code.
    pub event_code: u8,
    /// Number of parameter bytes following the header.
    pub data_total_length: u8,
}

impl EventHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 2;

    /// Build an event header.
    #[must_use]
    pub const fn new(event_code: u8, data_total_length: u8) -> Self {
        Self {
            event_code,
            data_total_length,
        }
    }

    fn parse(bytes: [u8; Self::LEN]) -> Self {
        let [event_code, data_total_length] = bytes;
        Self {
            event_code,
            data_total_length,
        }
    }

    fn write<B: BufMut>(self, dst: &mut B) {
        dst.put_u8(self.event_code);
        dst.put_u8(self.data_total_length);
    }
}

/// Header of a framed packet, tagged by packet type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketHeader {
    /// Command header.
    Command(CommandHeader),
    /// ACL data header.
    AclData(AclDataHeader),
    /// Event header.
    Event(EventHeader),
}

impl PacketHeader {
    /// Parse the header of `packet_type` from exactly its encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::UnsupportedPacketType`] for synchronous data and
    /// [`FramingError::Truncated`] if `bytes` is not the header's length.
    ///
    /// # Examples
    ///
    /// ```
    /// use hciframe::packet::{PacketHeader, PacketType};
    ///
    /// let header = PacketHeader::parse(PacketType::Event, &[0x0E, 0x04]).expect("event header");
    /// assert_eq!(header.payload_len(), 4);
    /// ```
    pub fn parse(packet_type: PacketType, bytes: &[u8]) -> Result<Self, FramingError> {
        let truncated = || FramingError::Truncated {
            have: bytes.len(),
            need: packet_type.header_len().unwrap_or_default(),
        };
        match packet_type {
            PacketType::Command => <[u8; CommandHeader::LEN]>::try_from(bytes)
                .map(|b| Self::Command(CommandHeader::parse(b)))
                .map_err(|_| truncated()),
            PacketType::AclData => <[u8; AclDataHeader::LEN]>::try_from(bytes)
                .map(|b| Self::AclData(AclDataHeader::parse(b)))
                .map_err(|_| truncated()),
            PacketType::Event => <[u8; EventHeader::LEN]>::try_from(bytes)
                .map(|b| Self::Event(EventHeader::parse(b)))
                .map_err(|_| truncated()),
            PacketType::SynchronousData => {
                Err(FramingError::UnsupportedPacketType { packet_type })
            }
        }
    }

    /// Packet type this header belongs to.
    #[must_use]
    pub const fn packet_type(&self) -> PacketType {
        match self {
            Self::Command(_) => PacketType::Command,
            Self::AclData(_) => PacketType::AclData,
            Self::Event(_) => PacketType::Event,
        }
    }

    /// Encoded header size in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Command(_) => CommandHeader::LEN,
            Self::AclData(_) => AclDataHeader::LEN,
            Self::Event(_) => EventHeader::LEN,
        }
    }

    /// Always false; headers have a fixed, non-zero size.
    #[must_use]
    pub const fn is_empty(&self) -> bool { false }

    /// Payload length declared by the header.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Command(h) => usize::from(h.parameter_total_length),
            Self::AclData(h) => usize::from(h.data_total_length),
            Self::Event(h) => usize::from(h.data_total_length),
        }
    }

    /// Write the header fields in wire order.
    pub fn write<B: BufMut>(&self, dst: &mut B) {
        match *self {
            Self::Command(h) => h.write(dst),
            Self::AclData(h) => h.write(dst),
            Self::Event(h) => h.write(dst),
        }
    }
}

impl From<CommandHeader> for PacketHeader {
    fn from(header: CommandHeader) -> Self { Self::Command(header) }
}

impl From<AclDataHeader> for PacketHeader {
    fn from(header: AclDataHeader) -> Self { Self::AclData(header) }
}

impl From<EventHeader> for PacketHeader {
    fn from(header: EventHeader) -> Self { Self::Event(header) }
}
