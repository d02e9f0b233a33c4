//! Client-to-server request payloads.

use serde::{Deserialize, Serialize};

use crate::header::MessageType;
use crate::payload::Payload;
use crate::wire::{WireReader, WireWriter};
use crate::{ProtocolError, ProtocolResult};

pub type MacAddress = [u8; 6];

pub const EMPTY_MAC_ADDRESS: MacAddress = [0; 6];

/// Asks the server for its protocol version. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionRequest;

impl Payload for VersionRequest {
    const MESSAGE_TYPE: MessageType = MessageType::Version;
    const SIZE: usize = 0;

    fn write(&self, _writer: &mut WireWriter) {}

    fn read(_reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self)
    }
}

/// Asks for slot information on up to four pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortInfoRequest {
    /// Number of entries of `pad_ids` the server should answer for.
    pub pad_count: u32,
    pub pad_ids: [u8; 4],
}

impl PortInfoRequest {
    pub fn single(pad_id: u8) -> Self {
        Self {
            pad_count: 1,
            pad_ids: [pad_id, 0, 0, 0],
        }
    }
}

impl Payload for PortInfoRequest {
    const MESSAGE_TYPE: MessageType = MessageType::PortInfo;
    const SIZE: usize = 8;

    fn write(&self, writer: &mut WireWriter) {
        writer.write_u32_le(self.pad_count).write_bytes(&self.pad_ids);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            pad_count: reader.read_u32_le()?,
            pad_ids: reader.read_array()?,
        })
    }
}

/// How a pad data subscription selects pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubscribeFlags {
    #[default]
    AllPads = 0,
    Id = 1,
    Mac = 2,
}

impl TryFrom<u8> for SubscribeFlags {
    type Error = ProtocolError;

    fn try_from(value: u8) -> ProtocolResult<Self> {
        match value {
            0 => Ok(Self::AllPads),
            1 => Ok(Self::Id),
            2 => Ok(Self::Mac),
            other => Err(ProtocolError::InvalidSubscribeFlags(other)),
        }
    }
}

/// Subscribes to pad data for a while; the server stops streaming unless
/// the request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PadDataRequest {
    pub flags: SubscribeFlags,
    pub pad_id: u8,
    pub mac: MacAddress,
}

impl PadDataRequest {
    pub fn by_id(pad_id: u8) -> Self {
        Self {
            flags: SubscribeFlags::Id,
            pad_id,
            mac: EMPTY_MAC_ADDRESS,
        }
    }
}

impl Payload for PadDataRequest {
    const MESSAGE_TYPE: MessageType = MessageType::PadData;
    const SIZE: usize = 8;

    fn write(&self, writer: &mut WireWriter) {
        writer
            .write_u8(self.flags as u8)
            .write_u8(self.pad_id)
            .write_bytes(&self.mac);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            flags: SubscribeFlags::try_from(reader.read_u8()?)?,
            pad_id: reader.read_u8()?,
            mac: reader.read_array()?,
        })
    }
}
