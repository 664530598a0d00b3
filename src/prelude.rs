//! Convenient re-exports for common `hciframe` types.
//!
//! ```
//! use hciframe::prelude::*;
//!
//! let mut decoder = FrameDecoder::new(FramingConfig::default());
//! assert_eq!(decoder.push_byte(0x01), Step::Pending);
//! ```

pub use crate::{
    codec::HciCodec,
    config::FramingConfig,
    decoder::{DecodeState, FrameDecoder, Step},
    error::{FramingError, TransportError},
    packet::{CompletePacket, PacketHeader, PacketType},
    sink::{PacketSink, PacketTransmitter},
    source::{ByteSource, SourceRead},
    transport::HciTransport,
};
