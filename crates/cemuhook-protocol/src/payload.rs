//! Fixed-layout payloads and the trait tying each one to its type code.

use crate::header::MessageType;
use crate::wire::{WireReader, WireWriter};
use crate::ProtocolResult;

/// A payload with a fixed little-endian layout following the header.
pub trait Payload: Sized {
    const MESSAGE_TYPE: MessageType;
    /// Encoded size in bytes, excluding the header.
    const SIZE: usize;

    fn write(&self, writer: &mut WireWriter);

    fn read(reader: &mut WireReader<'_>) -> ProtocolResult<Self>;
}
