//! CemuhookUDP (DSU) wire protocol
//!
//! This crate implements the datagram format spoken by cemuhook-compatible
//! motion servers: a 20-byte header guarded by a magic value and a CRC-32,
//! followed by one of three fixed-layout payloads. All fields are
//! little-endian and decoded field by field, never by reinterpreting memory.
//!
//! ## Features
//! - Header validation (length, magic, declared length, CRC-32)
//! - Version, port info and pad data payloads in both directions
//! - Deterministic request/response construction
//!
//! # Example
//!
//! ```
//! use cemuhook_udp_protocol::{
//!     encode_response, MessageType, PadData, Response, validate,
//! };
//!
//! let datagram = encode_response(&PadData { packet_counter: 7, ..PadData::default() }, 0);
//! assert_eq!(validate(&datagram), Some(MessageType::PadData));
//!
//! match Response::parse(&datagram) {
//!     Ok(Response::PadData(pad)) => assert_eq!(pad.packet_counter, 7),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod header;
pub mod payload;
pub mod request;
pub mod response;
pub mod wire;

pub use codec::{
    check, decode, encode_message, encode_request, encode_response, validate, validate_request,
    Response,
};
pub use header::{
    Header, MessageType, CLIENT_MAGIC, HEADER_SIZE, PROTOCOL_VERSION, SERVER_MAGIC,
};
pub use payload::Payload;
pub use request::*;
pub use response::*;

use thiserror::Error;

/// Largest datagram the client needs to receive: header plus pad data.
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + <PadData as Payload>::SIZE;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Datagram too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("Invalid magic: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic { expected: u32, actual: u32 },

    #[error("Invalid payload length {declared}: {available} bytes available")]
    PayloadLength { declared: u16, available: usize },

    #[error("CRC mismatch: header says {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("Unknown message type: {0:#010x}")]
    UnknownMessageType(u32),

    #[error("Truncated payload: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid subscribe flags: {0}")]
    InvalidSubscribeFlags(u8),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
