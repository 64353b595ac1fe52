//! Message layout, checksum and encoding
//!
//! Message format:
//! - START (1 byte): synchronization byte, [`MESSAGE_START`] by default
//! - LENGTH (1 byte): total message length, START through CHECKSUM (3-255)
//! - PAYLOAD (LENGTH - 3 bytes): application data
//! - CHECKSUM (1 byte): XOR of all PAYLOAD bytes
//!
//! Validation XORs every byte from offset 2 to the end, checksum
//! included, and expects zero.

use core::fmt;

use heapless::Vec;

/// Default message synchronization byte
pub const MESSAGE_START: u8 = 0xAA;

/// Shortest valid message: START + LENGTH + CHECKSUM
pub const MIN_MESSAGE_LEN: usize = 3;

/// Longest message the one-byte LENGTH field can describe
pub const MAX_MESSAGE_LEN: usize = u8::MAX as usize;

/// Owned copy of a complete message, header and checksum included
pub type Message = Vec<u8, MAX_MESSAGE_LEN>;

/// Errors that can occur while queuing or extracting messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramingError {
    /// Ring held no bytes
    Empty,
    /// First byte was not the start marker (it has been consumed)
    InvalidStart,
    /// LENGTH below the minimum, or message too long to encode
    InvalidLength,
    /// Not enough free space in the ring for the whole message
    InsufficientSpace,
    /// Ring ran dry before LENGTH bytes were read
    Incomplete,
    /// XOR over payload and checksum was not zero
    ChecksumMismatch,
    /// Output buffer shorter than the message
    BufferTooSmall,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FramingError::Empty => "no data available",
            FramingError::InvalidStart => "invalid start byte",
            FramingError::InvalidLength => "invalid message length",
            FramingError::InsufficientSpace => "insufficient space in ring",
            FramingError::Incomplete => "incomplete message",
            FramingError::ChecksumMismatch => "checksum mismatch",
            FramingError::BufferTooSmall => "output buffer too small",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for FramingError {}

/// XOR of all bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// Build a complete message around `payload`
///
/// Writes START, LENGTH, the payload and its checksum into `buffer` and
/// returns the number of bytes written.
pub fn encode_message(start: u8, payload: &[u8], buffer: &mut [u8]) -> Result<usize, FramingError> {
    let len = payload.len() + MIN_MESSAGE_LEN;
    if len > MAX_MESSAGE_LEN {
        return Err(FramingError::InvalidLength);
    }
    if buffer.len() < len {
        return Err(FramingError::BufferTooSmall);
    }

    buffer[0] = start;
    buffer[1] = len as u8;
    buffer[2..2 + payload.len()].copy_from_slice(payload);
    buffer[len - 1] = checksum(payload);

    Ok(len)
}
