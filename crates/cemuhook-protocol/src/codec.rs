//! Validation, decoding and message construction.

use serde::Serialize;
use tracing::{debug, trace};

use crate::header::{
    checksum, Header, MessageType, CLIENT_MAGIC, CRC_OFFSET, HEADER_PREFIX_SIZE, HEADER_SIZE,
    PROTOCOL_VERSION, SERVER_MAGIC,
};
use crate::payload::Payload;
use crate::response::{PadData, PortInfo, Version};
use crate::wire::{WireReader, WireWriter};
use crate::{ProtocolError, ProtocolResult};

/// Checks a received datagram against `magic` and returns its header and type.
///
/// The CRC covers every received byte, so a datagram truncated by the
/// receive buffer fails here.
pub fn check(datagram: &[u8], magic: u32) -> ProtocolResult<(Header, MessageType)> {
    if datagram.len() < HEADER_SIZE {
        return Err(ProtocolError::TooShort {
            expected: HEADER_SIZE,
            actual: datagram.len(),
        });
    }

    let header = Header::read(&mut WireReader::new(datagram))?;
    if header.magic != magic {
        return Err(ProtocolError::BadMagic {
            expected: magic,
            actual: header.magic,
        });
    }

    if header.protocol_version != PROTOCOL_VERSION {
        trace!(
            "Ignoring protocol version mismatch: expected {PROTOCOL_VERSION}, got {}",
            header.protocol_version
        );
    }

    if header.payload_length == 0 || header.message_len() > datagram.len() {
        return Err(ProtocolError::PayloadLength {
            declared: header.payload_length,
            available: datagram.len().saturating_sub(HEADER_PREFIX_SIZE),
        });
    }

    let computed = checksum(datagram);
    if computed != header.crc {
        return Err(ProtocolError::ChecksumMismatch {
            expected: header.crc,
            actual: computed,
        });
    }

    let kind = header.kind()?;
    Ok((header, kind))
}

/// Returns the type of a well-formed server datagram, or `None`.
pub fn validate(datagram: &[u8]) -> Option<MessageType> {
    match check(datagram, SERVER_MAGIC) {
        Ok((_, kind)) => Some(kind),
        Err(e) => {
            debug!("Invalid UDP packet received: {e}");
            None
        }
    }
}

/// Server-side counterpart of [`validate`] for datagrams sent by clients.
pub fn validate_request(datagram: &[u8]) -> Option<MessageType> {
    match check(datagram, CLIENT_MAGIC) {
        Ok((_, kind)) => Some(kind),
        Err(e) => {
            debug!("Invalid UDP request received: {e}");
            None
        }
    }
}

/// Reads the payload following the header.
///
/// Expects a datagram that already passed [`check`]; a short buffer yields
/// [`ProtocolError::Truncated`].
pub fn decode<T: Payload>(datagram: &[u8]) -> ProtocolResult<T> {
    T::read(&mut WireReader::at(datagram, HEADER_SIZE))
}

/// Builds a complete datagram around `payload`.
pub fn encode_message<T: Payload>(payload: &T, magic: u32, client_id: u32) -> Vec<u8> {
    let header = Header::new(magic, client_id, T::MESSAGE_TYPE, T::SIZE);
    let mut writer = WireWriter::with_capacity(HEADER_SIZE + T::SIZE);
    header.write(&mut writer);
    payload.write(&mut writer);

    let crc = checksum(writer.as_slice());
    writer.patch_u32_le(CRC_OFFSET, crc);
    writer.into_inner()
}

pub fn encode_request<T: Payload>(payload: &T, client_id: u32) -> Vec<u8> {
    encode_message(payload, CLIENT_MAGIC, client_id)
}

pub fn encode_response<T: Payload>(payload: &T, server_id: u32) -> Vec<u8> {
    encode_message(payload, SERVER_MAGIC, server_id)
}

/// A validated server datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Version(Version),
    PortInfo(PortInfo),
    PadData(PadData),
}

impl Response {
    pub fn parse(datagram: &[u8]) -> ProtocolResult<Self> {
        let (_, kind) = check(datagram, SERVER_MAGIC)?;
        Ok(match kind {
            MessageType::Version => Self::Version(decode(datagram)?),
            MessageType::PortInfo => Self::PortInfo(decode(datagram)?),
            MessageType::PadData => Self::PadData(decode(datagram)?),
        })
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Version(_) => MessageType::Version,
            Self::PortInfo(_) => MessageType::PortInfo,
            Self::PadData(_) => MessageType::PadData,
        }
    }
}
