//! Test helpers for exercising `hciframe` decoders, codecs, and transports.
//!
//! These helpers build raw HCI frames byte by byte (independently of the
//! crate's encoder), feed them through decoders in arbitrary chunk sizes, and
//! record what a transport dispatched or transmitted.
//!
//! ```rust
//! use hciframe_testing::{decode_in_chunks, event_frame};
//!
//! let packets = decode_in_chunks(&event_frame(0x0E, &[0x01, 0x03, 0x0C, 0x00]), 1);
//! assert_eq!(packets.len(), 1);
//! ```

pub mod frames;
pub mod logging;
pub mod recording;
pub mod strategies;

pub use frames::{
    acl_frame,
    acl_header_only,
    command_frame,
    decode_all,
    decode_in_chunks,
    decode_in_chunks_with,
    event_frame,
};
pub use logging::{LoggerHandle, logger};
pub use recording::{RecordingSink, RecordingTransmitter, SinkFailure};
pub use strategies::{
    chunk_size_strategy,
    deterministic_runner,
    garbage_strategy,
    packet_sequence_strategy,
    packet_strategy,
};
