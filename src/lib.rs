#![doc(html_root_url = "https://docs.rs/hciframe/latest")]
//! Public API for the `hciframe` library.
//!
//! This crate frames Host Controller Interface packets carried over a
//! byte-accurate serial transport. The [`decoder`] rebuilds Command, ACL
//! data, and Event packets from a stream fed in arbitrary chunks, down to one
//! byte at a time; the [`encoder`] prefixes outbound packets with their
//! packet-type marker. [`transport`] wires both to an upper layer, and
//! [`codec`] adapts them to `tokio_util` for async streams.

pub mod byte_order;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod packet;
pub mod prelude;
pub mod sink;
pub mod source;
pub mod transport;

pub use codec::HciCodec;
pub use config::FramingConfig;
pub use decoder::{DecodeState, DecoderStats, FrameDecoder, Step};
pub use encoder::{encode_frame, encode_packet, frame_bytes, packet_bytes};
pub use error::{EofError, FramingError, HeaderError, TransportError};
pub use packet::{
    AclDataHeader,
    CommandHeader,
    CompletePacket,
    EventHeader,
    PacketHeader,
    PacketType,
};
pub use sink::{PacketSink, PacketTransmitter};
pub use source::{BufSource, ByteSource, SourceRead};
pub use transport::{HciTransport, drive_reader};
