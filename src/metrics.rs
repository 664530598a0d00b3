//! Metric helpers for `hciframe`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::{error::FramingError, packet::PacketType};

/// Name of the counter tracking packets emitted by the decoder.
pub const PACKETS_DECODED: &str = "hciframe_packets_decoded_total";
/// Name of the counter tracking in-flight packets discarded on resync.
pub const PACKETS_REJECTED: &str = "hciframe_packets_rejected_total";
/// Name of the counter tracking non-marker bytes dropped while resynchronising.
pub const BYTES_DISCARDED: &str = "hciframe_bytes_discarded_total";
/// Name of the counter tracking packets framed by the encoder.
pub const PACKETS_ENCODED: &str = "hciframe_packets_encoded_total";

/// Record a packet completed by the decoder.
pub fn inc_decoded(packet_type: PacketType) {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_DECODED, "type" => packet_type.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = packet_type;
}

/// Record an in-flight packet discarded for `reason`.
pub fn inc_rejected(reason: &FramingError) {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_REJECTED, "reason" => reason.reason()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record bytes dropped while waiting for a marker.
pub fn add_discarded(bytes: u64) {
    #[cfg(feature = "metrics")]
    counter!(BYTES_DISCARDED).increment(bytes);
    #[cfg(not(feature = "metrics"))]
    let _ = bytes;
}

/// Record a packet framed for transmission.
pub fn inc_encoded(packet_type: PacketType) {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_ENCODED, "type" => packet_type.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = packet_type;
}
