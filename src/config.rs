//! Framing configuration.
//!
//! [`FramingConfig`] carries the two bounds the decoder enforces: the largest
//! ACL data length accepted at header validation, and the size of the packet
//! buffer every in-flight packet must fit in.

use serde::{Deserialize, Serialize};

use crate::packet::{AclDataHeader, CommandHeader, PacketType};

/// Default maximum ACL data length (the LE default data length).
pub const DEFAULT_MAX_ACL_DATA_LENGTH: u16 = 27;

/// Largest parameter length a Command or Event header can declare.
pub const MAX_PARAMETER_LENGTH: usize = u8::MAX as usize;

/// Minimum packet buffer size in bytes.
///
/// Buffer sizes are clamped to at least this value so that every Command and
/// Event packet fits.
pub const MIN_PACKET_SIZE: usize = CommandHeader::LEN + MAX_PARAMETER_LENGTH;

/// Maximum packet buffer size in bytes.
///
/// Buffer sizes are clamped to at most the largest ACL packet a header can
/// describe.
pub const MAX_PACKET_SIZE: usize = AclDataHeader::LEN + u16::MAX as usize;

/// Default packet buffer size: the largest header plus 255 parameter bytes.
pub const DEFAULT_MAX_PACKET_SIZE: usize = AclDataHeader::LEN + MAX_PARAMETER_LENGTH;

pub(crate) fn clamp_packet_size(value: usize) -> usize {
    value.clamp(MIN_PACKET_SIZE, MAX_PACKET_SIZE)
}

/// Bounds applied by the frame decoder.
///
/// The ACL data length is kept as requested; the packet buffer caps it when
/// headers are validated, see [`max_payload_len`](Self::max_payload_len).
/// Setter order therefore does not matter.
///
/// Deserialised values go through the same clamping as the setters.
///
/// # Examples
///
/// ```
/// use hciframe::{config::FramingConfig, packet::PacketType};
///
/// let config = FramingConfig::default()
///     .with_max_acl_data_length(251)
///     .with_max_packet_size(1024);
///
/// assert_eq!(config.max_acl_data_length(), 251);
/// assert_eq!(config.max_packet_size(), 1024);
/// assert_eq!(config.max_payload_len(PacketType::AclData), Some(251));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFramingConfig")]
pub struct FramingConfig {
    max_acl_data_length: u16,
    max_packet_size: usize,
}

/// Unvalidated mirror of [`FramingConfig`] used for deserialisation.
#[derive(Deserialize)]
#[serde(default)]
struct RawFramingConfig {
    max_acl_data_length: u16,
    max_packet_size: usize,
}

impl Default for RawFramingConfig {
    fn default() -> Self {
        Self {
            max_acl_data_length: DEFAULT_MAX_ACL_DATA_LENGTH,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

impl From<RawFramingConfig> for FramingConfig {
    fn from(raw: RawFramingConfig) -> Self { Self::new(raw.max_acl_data_length, raw.max_packet_size) }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_acl_data_length: DEFAULT_MAX_ACL_DATA_LENGTH,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

impl FramingConfig {
    /// Construct a configuration, clamping the packet buffer size.
    #[must_use]
    pub fn new(max_acl_data_length: u16, max_packet_size: usize) -> Self {
        Self {
            max_acl_data_length,
            max_packet_size,
        }
        .normalised()
    }

    /// Set the largest ACL data length accepted at header validation.
    #[must_use]
    pub fn with_max_acl_data_length(mut self, length: u16) -> Self {
        self.max_acl_data_length = length;
        self
    }

    /// Set the packet buffer size, clamped to
    /// [`MIN_PACKET_SIZE`]..=[`MAX_PACKET_SIZE`].
    #[must_use]
    pub fn with_max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size;
        self.normalised()
    }

    /// Re-apply the packet buffer clamp.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.max_packet_size = clamp_packet_size(self.max_packet_size);
        self
    }

    /// ACL data length requested at configuration.
    ///
    /// The bound actually enforced is
    /// [`max_payload_len(PacketType::AclData)`](Self::max_payload_len), which
    /// is lower when the packet buffer cannot hold this much data.
    #[must_use]
    pub const fn max_acl_data_length(&self) -> u16 { self.max_acl_data_length }

    /// Packet buffer size (header plus payload, excluding the marker).
    #[must_use]
    pub const fn max_packet_size(&self) -> usize { self.max_packet_size }

    /// Payload bound applied when validating a header of `packet_type`.
    ///
    /// ACL data is bounded by [`max_acl_data_length`](Self::max_acl_data_length)
    /// and by the room left in the packet buffer; Command and Event packets
    /// only by the buffer. Returns `None` for packet types that are never
    /// framed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hciframe::{config::FramingConfig, packet::PacketType};
    ///
    /// let config = FramingConfig::default();
    /// assert_eq!(config.max_payload_len(PacketType::AclData), Some(27));
    /// assert_eq!(config.max_payload_len(PacketType::Event), Some(257));
    /// assert_eq!(config.max_payload_len(PacketType::SynchronousData), None);
    ///
    /// let capped = config.with_max_acl_data_length(1000);
    /// assert_eq!(capped.max_payload_len(PacketType::AclData), Some(255));
    /// ```
    #[must_use]
    pub fn max_payload_len(&self, packet_type: PacketType) -> Option<usize> {
        let header_len = packet_type.header_len()?;
        let buffer_room = self.max_packet_size.saturating_sub(header_len);
        Some(match packet_type {
            PacketType::AclData => usize::from(self.max_acl_data_length).min(buffer_room),
            _ => buffer_room,
        })
    }
}
