//! Error types for HCI framing and transport.
//!
//! The framing layer never escalates malformed input: every [`FramingError`]
//! produced by the decoder is a resynchronisation reason, logged and counted
//! before the decoder returns to waiting for the next marker byte. The other
//! types cover header construction, async end-of-stream handling, and the
//! pre-framed receive path of [`HciTransport`](crate::transport::HciTransport).
//!
//! # Error Categories
//!
//! - [`FramingError`]: Wire-level issues in packet structure (unknown or unsupported markers,
//!   declared lengths beyond the configured bounds, bodies that disagree with their header).
//! - [`HeaderError`]: A header field does not fit its bit width.
//! - [`EofError`]: An async stream ended part way through a packet.
//! - [`TransportError`]: Failures surfaced by the transport's receive and source paths.

use std::io;

use thiserror::Error;

use crate::packet::PacketType;

/// Framing-level errors found while delimiting HCI packets.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The byte is not a packet-type marker.
    #[error("unrecognised packet marker {byte:#04x}")]
    UnrecognisedMarker {
        /// Byte found where a marker was expected.
        byte: u8,
    },

    /// The marker names a packet type this layer does not frame.
    #[error("unsupported packet type: {packet_type}")]
    UnsupportedPacketType {
        /// Packet type that was rejected.
        packet_type: PacketType,
    },

    /// The header declares more payload than the configured bound allows.
    #[error("{packet_type} payload exceeds max length: {declared} > {max}")]
    OversizedPayload {
        /// Packet type carrying the oversized header.
        packet_type: PacketType,
        /// Payload length declared by the header.
        declared: usize,
        /// Largest payload accepted for this packet type.
        max: usize,
    },

    /// The payload length disagrees with the length declared in the header.
    #[error("payload length mismatch: header declares {declared}, got {actual}")]
    LengthMismatch {
        /// Payload length declared by the header.
        declared: usize,
        /// Payload bytes actually present.
        actual: usize,
    },

    /// Fewer bytes are available than the header requires.
    #[error("truncated packet: have {have}, need {need}")]
    Truncated {
        /// Bytes available.
        have: usize,
        /// Bytes required.
        need: usize,
    },
}

impl FramingError {
    /// Short reason label used for logging and metrics.
    ///
    /// # Examples
    ///
    /// ```
    /// use hciframe::error::FramingError;
    ///
    /// let err = FramingError::UnrecognisedMarker { byte: 0xFF };
    /// assert_eq!(err.reason(), "unrecognised_marker");
    /// ```
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnrecognisedMarker { .. } => "unrecognised_marker",
            Self::UnsupportedPacketType { .. } => "unsupported_packet_type",
            Self::OversizedPayload { .. } => "oversized_payload",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::Truncated { .. } => "truncated",
        }
    }
}

/// Errors raised when building a header from field values.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// A field value does not fit the bits reserved for it.
    #[error("header field {field} out of range: {value} > {max}")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied by the caller.
        value: u16,
        /// Largest representable value.
        max: u16,
    },
}

/// Premature end of an async byte stream.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EofError {
    /// The stream ended while a packet header was being read.
    #[error("premature EOF during header: {bytes_received} of {header_size} header bytes")]
    MidHeader {
        /// Header bytes received before EOF.
        bytes_received: usize,
        /// Header size for the in-flight packet type.
        header_size: usize,
    },

    /// The stream ended while a packet payload was being read.
    #[error("premature EOF: {bytes_received} bytes of {expected} byte packet received")]
    MidPacket {
        /// Header and payload bytes received before EOF.
        bytes_received: usize,
        /// Header and payload bytes the packet declared.
        expected: usize,
    },
}

/// Errors surfaced by [`HciTransport`](crate::transport::HciTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The byte source reported a failure.
    #[error("byte source error: {0}")]
    Source(#[from] io::Error),

    /// A pre-framed buffer starts with a byte that is not a framed packet type.
    #[error("unknown packet type {byte:#04x}")]
    UnknownPacketType {
        /// Leading byte of the rejected buffer.
        byte: u8,
    },

    /// A pre-framed buffer was empty.
    #[error("empty packet buffer")]
    EmptyPacket,

    /// A pre-framed buffer failed header validation.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// The dispatch sink rejected the packet.
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

impl From<FramingError> for io::Error {
    fn from(err: FramingError) -> Self { io::Error::new(io::ErrorKind::InvalidData, err) }
}

impl From<EofError> for io::Error {
    fn from(err: EofError) -> Self { io::Error::new(io::ErrorKind::UnexpectedEof, err) }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::{EofError, FramingError};
    use crate::packet::PacketType;

    #[rstest]
    #[case::marker(FramingError::UnrecognisedMarker { byte: 0x7F }, "0x7f")]
    #[case::unsupported(
        FramingError::UnsupportedPacketType { packet_type: PacketType::SynchronousData },
        "synchronous"
    )]
    #[case::oversized(
        FramingError::OversizedPayload { packet_type: PacketType::AclData, declared: 28, max: 27 },
        "28 > 27"
    )]
    fn framing_error_messages_name_the_problem(
        #[case] err: FramingError,
        #[case] expected_substring: &str,
    ) {
        let message = err.to_string();
        assert!(
            message.contains(expected_substring),
            "error message should contain '{expected_substring}', got: {message}"
        );
    }

    #[test]
    fn framing_errors_map_to_invalid_data() {
        let err: io::Error = FramingError::Truncated { have: 1, need: 3 }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn eof_errors_map_to_unexpected_eof() {
        let err: io::Error = EofError::MidPacket {
            bytes_received: 2,
            expected: 10,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(err.to_string().contains("2 bytes of 10"));
    }
}
