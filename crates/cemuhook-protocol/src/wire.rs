//! Little-endian byte cursors used by every payload layout.

use crate::{ProtocolError, ProtocolResult};

/// Bounds-checked reader over a borrowed datagram.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Starts reading at `offset`. An offset past the end leaves nothing to read.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            position: offset.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn read_exact(&mut self, count: usize) -> ProtocolResult<&'a [u8]> {
        let start = self.position;
        let data = self.data;
        let (end, bytes) = start
            .checked_add(count)
            .and_then(|end| data.get(start..end).map(|bytes| (end, bytes)))
            .ok_or(ProtocolError::Truncated {
                offset: start,
                needed: count,
                available: self.remaining(),
            })?;
        self.position = end;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> ProtocolResult<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> ProtocolResult<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> ProtocolResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> ProtocolResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> ProtocolResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32_le(&mut self) -> ProtocolResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }
}

/// Growable little-endian writer for outbound messages.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl WireWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32_le(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64_le(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32_le(&mut self, value: f32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(data);
        self
    }

    /// Overwrites four already-written bytes at `offset`.
    ///
    /// Returns `false` and leaves the buffer untouched when the range has not
    /// been written yet.
    pub fn patch_u32_le(&mut self, offset: usize, value: u32) -> bool {
        let Some(end) = offset.checked_add(4) else {
            return false;
        };
        match self.buffer.get_mut(offset..end) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
