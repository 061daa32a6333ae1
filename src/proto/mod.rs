// src/proto/mod.rs — collectd binary network protocol

pub mod decode;
pub mod interpret;
pub mod parts;

pub use decode::decode_packet;
pub use interpret::{Event, Identity, Interpreter, Notification, ValueList};
pub use parts::{cdtime_to_unix, DsType, Part, PartType, Severity, Value};

use thiserror::Error;

/// Port the collectd network plugin sends to by default.
pub const DEFAULT_PORT: u16 = 25826;

pub const DEFAULT_IPV4_GROUP: &str = "239.192.74.66";
pub const DEFAULT_IPV6_GROUP: &str = "ff18::efc0:4a42";

/// Receive buffer size; collectd packets never exceed 65531 bytes.
pub const RECV_BUFFER_SIZE: usize = 65535;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("truncated part header at offset {offset} (buffer is {len} bytes)")]
    TruncatedHeader { offset: usize, len: usize },

    #[error("part type {part_type:#06x} at offset {offset} declares length {declared}, smaller than the 4-byte header")]
    BadLength {
        part_type: u16,
        offset: usize,
        declared: usize,
    },

    #[error("part at offset {offset} declares {declared} bytes but only {remaining} remain")]
    Overrun {
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    #[error("unrecognized part type {0:#06x}")]
    UnknownPart(u16),

    #[error("signed or encrypted part {0:#06x} is not supported")]
    UnsupportedPart(u16),

    #[error("unsupported data source type {0}")]
    UnsupportedDsType(u8),

    #[error("values part declares {declared} bytes, expected {expected} for {count} values")]
    ValueSizeMismatch {
        declared: usize,
        expected: usize,
        count: usize,
    },

    #[error("{part_type:?} part payload is too short ({len} bytes)")]
    ShortPayload { part_type: PartType, len: usize },
}
