//! Server-to-client response payloads.
//!
//! Byte-valued enumerations (slot state, model, battery...) are stored raw so
//! that every datagram decodes and re-encodes unchanged; the typed views are
//! computed on demand.

use serde::{Deserialize, Serialize};

use crate::header::MessageType;
use crate::payload::Payload;
use crate::request::MacAddress;
use crate::wire::{WireReader, WireWriter};
use crate::ProtocolResult;

/// Highest protocol version the server supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    pub version: u16,
}

impl Payload for Version {
    const MESSAGE_TYPE: MessageType = MessageType::Version;
    const SIZE: usize = 2;

    fn write(&self, writer: &mut WireWriter) {
        writer.write_u16_le(self.version);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            version: reader.read_u16_le()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Disconnected,
    Reserved,
    Connected,
    Unknown(u8),
}

impl From<u8> for SlotState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Disconnected,
            1 => Self::Reserved,
            2 => Self::Connected,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    NotApplicable,
    PartialGyro,
    FullGyro,
    Unknown(u8),
}

impl From<u8> for DeviceModel {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NotApplicable,
            1 => Self::PartialGyro,
            2 => Self::FullGyro,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    NotApplicable,
    Usb,
    Bluetooth,
    Unknown(u8),
}

impl From<u8> for ConnectionType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NotApplicable,
            1 => Self::Usb,
            2 => Self::Bluetooth,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    NotApplicable,
    Dying,
    Low,
    Medium,
    High,
    Full,
    Charging,
    Charged,
    Unknown(u8),
}

impl From<u8> for BatteryStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::NotApplicable,
            0x01 => Self::Dying,
            0x02 => Self::Low,
            0x03 => Self::Medium,
            0x04 => Self::High,
            0x05 => Self::Full,
            0xEE => Self::Charging,
            0xEF => Self::Charged,
            other => Self::Unknown(other),
        }
    }
}

/// Slot description, sent alone as a port info response and embedded at the
/// start of every pad data response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortInfo {
    pub pad_id: u8,
    pub state: u8,
    pub model: u8,
    pub connection_type: u8,
    pub mac: MacAddress,
    pub battery: u8,
    pub is_active: u8,
}

impl PortInfo {
    pub fn slot_state(&self) -> SlotState {
        SlotState::from(self.state)
    }

    pub fn device_model(&self) -> DeviceModel {
        DeviceModel::from(self.model)
    }

    pub fn connection(&self) -> ConnectionType {
        ConnectionType::from(self.connection_type)
    }

    pub fn battery_status(&self) -> BatteryStatus {
        BatteryStatus::from(self.battery)
    }
}

impl Payload for PortInfo {
    const MESSAGE_TYPE: MessageType = MessageType::PortInfo;
    const SIZE: usize = 12;

    fn write(&self, writer: &mut WireWriter) {
        writer
            .write_u8(self.pad_id)
            .write_u8(self.state)
            .write_u8(self.model)
            .write_u8(self.connection_type)
            .write_bytes(&self.mac)
            .write_u8(self.battery)
            .write_u8(self.is_active);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            pad_id: reader.read_u8()?,
            state: reader.read_u8()?,
            model: reader.read_u8()?,
            connection_type: reader.read_u8()?,
            mac: reader.read_array()?,
            battery: reader.read_u8()?,
            is_active: reader.read_u8()?,
        })
    }
}

/// One touch contact in raw touchpad units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TouchPoint {
    pub is_active: u8,
    pub id: u8,
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn active(&self) -> bool {
        self.is_active != 0
    }

    fn write(&self, writer: &mut WireWriter) {
        writer
            .write_u8(self.is_active)
            .write_u8(self.id)
            .write_u16_le(self.x)
            .write_u16_le(self.y);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            is_active: reader.read_u8()?,
            id: reader.read_u8()?,
            x: reader.read_u16_le()?,
            y: reader.read_u16_le()?,
        })
    }
}

/// Acceleration in g.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Accelerometer {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Angular velocity in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gyroscope {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Full controller sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PadData {
    pub info: PortInfo,
    /// Incremented by the server for every sample it sends.
    pub packet_counter: u32,
    pub buttons: u16,
    pub home: u8,
    pub touch_click: u8,
    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub right_stick_x: u8,
    pub right_stick_y: u8,
    pub analog_buttons: [u8; 12],
    pub touch_1: TouchPoint,
    pub touch_2: TouchPoint,
    /// Microseconds, server clock.
    pub motion_timestamp: u64,
    pub accel: Accelerometer,
    pub gyro: Gyroscope,
}

impl Payload for PadData {
    const MESSAGE_TYPE: MessageType = MessageType::PadData;
    const SIZE: usize = 80;

    fn write(&self, writer: &mut WireWriter) {
        self.info.write(writer);
        writer
            .write_u32_le(self.packet_counter)
            .write_u16_le(self.buttons)
            .write_u8(self.home)
            .write_u8(self.touch_click)
            .write_u8(self.left_stick_x)
            .write_u8(self.left_stick_y)
            .write_u8(self.right_stick_x)
            .write_u8(self.right_stick_y)
            .write_bytes(&self.analog_buttons);
        self.touch_1.write(writer);
        self.touch_2.write(writer);
        writer
            .write_u64_le(self.motion_timestamp)
            .write_f32_le(self.accel.x)
            .write_f32_le(self.accel.y)
            .write_f32_le(self.accel.z)
            .write_f32_le(self.gyro.pitch)
            .write_f32_le(self.gyro.yaw)
            .write_f32_le(self.gyro.roll);
    }

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            info: PortInfo::read(reader)?,
            packet_counter: reader.read_u32_le()?,
            buttons: reader.read_u16_le()?,
            home: reader.read_u8()?,
            touch_click: reader.read_u8()?,
            left_stick_x: reader.read_u8()?,
            left_stick_y: reader.read_u8()?,
            right_stick_x: reader.read_u8()?,
            right_stick_y: reader.read_u8()?,
            analog_buttons: reader.read_array()?,
            touch_1: TouchPoint::read(reader)?,
            touch_2: TouchPoint::read(reader)?,
            motion_timestamp: reader.read_u64_le()?,
            accel: Accelerometer {
                x: reader.read_f32_le()?,
                y: reader.read_f32_le()?,
                z: reader.read_f32_le()?,
            },
            gyro: Gyroscope {
                pitch: reader.read_f32_le()?,
                yaw: reader.read_f32_le()?,
                roll: reader.read_f32_le()?,
            },
        })
    }
}
