//! Message header shared by requests and responses.
//!
//! ```text
//! offset  size  field
//!      0     4  magic            "DSUC" (client) / "DSUS" (server)
//!      4     2  protocol_version 1001
//!      6     2  payload_length   message type field + payload
//!      8     4  crc32            IEEE CRC-32 of the datagram with this field zeroed
//!     12     4  client_id
//!     16     4  message_type
//! ```

use serde::{Deserialize, Serialize};

use crate::wire::{WireReader, WireWriter};
use crate::{ProtocolError, ProtocolResult};

/// `"DSUC"` read as a little-endian `u32`.
pub const CLIENT_MAGIC: u32 = 0x4355_5344;
/// `"DSUS"` read as a little-endian `u32`.
pub const SERVER_MAGIC: u32 = 0x5355_5344;
pub const PROTOCOL_VERSION: u16 = 1001;

/// Size of the header including the message type field.
pub const HEADER_SIZE: usize = 20;
/// Bytes preceding the region counted by `payload_length`.
pub const HEADER_PREFIX_SIZE: usize = 16;
pub const MESSAGE_TYPE_SIZE: usize = 4;
pub const CRC_OFFSET: usize = 8;
const CRC_END: usize = CRC_OFFSET + 4;

/// Type code carried in the last header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MessageType {
    Version = 0x0010_0000,
    PortInfo = 0x0010_0001,
    PadData = 0x0010_0002,
}

impl MessageType {
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for MessageType {
    type Error = ProtocolError;

    fn try_from(code: u32) -> ProtocolResult<Self> {
        match code {
            0x0010_0000 => Ok(Self::Version),
            0x0010_0001 => Ok(Self::PortInfo),
            0x0010_0002 => Ok(Self::PadData),
            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }
}

/// Decoded header fields. `message_type` stays raw until validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub protocol_version: u16,
    pub payload_length: u16,
    pub crc: u32,
    pub client_id: u32,
    pub message_type: u32,
}

impl Header {
    pub fn new(magic: u32, client_id: u32, message_type: MessageType, payload_size: usize) -> Self {
        let payload_length = u16::try_from(MESSAGE_TYPE_SIZE.saturating_add(payload_size))
            .unwrap_or(u16::MAX);
        Self {
            magic,
            protocol_version: PROTOCOL_VERSION,
            payload_length,
            crc: 0,
            client_id,
            message_type: message_type.code(),
        }
    }

    pub fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            magic: reader.read_u32_le()?,
            protocol_version: reader.read_u16_le()?,
            payload_length: reader.read_u16_le()?,
            crc: reader.read_u32_le()?,
            client_id: reader.read_u32_le()?,
            message_type: reader.read_u32_le()?,
        })
    }

    pub fn write(&self, writer: &mut WireWriter) {
        writer
            .write_u32_le(self.magic)
            .write_u16_le(self.protocol_version)
            .write_u16_le(self.payload_length)
            .write_u32_le(self.crc)
            .write_u32_le(self.client_id)
            .write_u32_le(self.message_type);
    }

    pub fn kind(&self) -> ProtocolResult<MessageType> {
        MessageType::try_from(self.message_type)
    }

    /// Total datagram length implied by `payload_length`.
    pub fn message_len(&self) -> usize {
        HEADER_PREFIX_SIZE + usize::from(self.payload_length)
    }
}

/// CRC-32 of `message` with the CRC field treated as zero.
pub fn checksum(message: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(message.get(..CRC_OFFSET).unwrap_or(message));
    if let Some(tail) = message.get(CRC_END..) {
        hasher.update(&[0u8; 4]);
        hasher.update(tail);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_magic_spells_dsu() {
        assert_eq!(&CLIENT_MAGIC.to_le_bytes(), b"DSUC");
        assert_eq!(&SERVER_MAGIC.to_le_bytes(), b"DSUS");
    }

    #[test]
    fn test_message_type_codes() -> TestResult {
        for kind in [
            MessageType::Version,
            MessageType::PortInfo,
            MessageType::PadData,
        ] {
            assert_eq!(MessageType::try_from(kind.code())?, kind);
        }
        assert!(matches!(
            MessageType::try_from(0x0010_0003),
            Err(ProtocolError::UnknownMessageType(0x0010_0003))
        ));
        Ok(())
    }

    #[test]
    fn test_header_layout() -> TestResult {
        let header = Header::new(CLIENT_MAGIC, 7, MessageType::PadData, 8);
        let mut writer = WireWriter::default();
        header.write(&mut writer);
        assert_eq!(writer.len(), HEADER_SIZE);

        let bytes = writer.into_inner();
        let mut reader = WireReader::new(&bytes);
        let parsed = Header::read(&mut reader)?;
        assert_eq!(parsed, header);
        assert_eq!(parsed.payload_length, 12);
        assert_eq!(parsed.message_len(), 28);
        assert_eq!(parsed.kind()?, MessageType::PadData);
        Ok(())
    }

    #[test]
    fn test_checksum_ignores_crc_field() {
        let mut message = vec![0u8; HEADER_SIZE];
        message[0] = 0x44;
        let before = checksum(&message);
        message[CRC_OFFSET..CRC_END].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(checksum(&message), before);
        message[HEADER_SIZE - 1] = 0xFF;
        assert_ne!(checksum(&message), before);
    }
}
