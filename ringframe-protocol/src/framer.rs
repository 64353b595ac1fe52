//! Whole-message queueing and extraction
//!
//! Extraction runs `AwaitStart -> AwaitLength -> Payload -> Validate`
//! within a single call and keeps no state between calls. Every failure
//! after the first pop has already consumed bytes from the ring; those
//! bytes are gone.

use ringframe_core::Fifo;

use crate::frame::{
    encode_message, FramingError, Message, MAX_MESSAGE_LEN, MESSAGE_START, MIN_MESSAGE_LEN,
};

/// Builds and parses messages against a [`Fifo`]
///
/// The framer only holds the start marker; the ring it operates on is
/// passed to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageFramer {
    start: u8,
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFramer {
    /// Framer using [`MESSAGE_START`]
    pub const fn new() -> Self {
        Self {
            start: MESSAGE_START,
        }
    }

    /// Framer using a custom start marker
    pub const fn with_start(start: u8) -> Self {
        Self { start }
    }

    /// The start marker this framer expects
    pub const fn start_byte(&self) -> u8 {
        self.start
    }

    /// Queue a complete, already-framed message
    ///
    /// The bytes are pushed verbatim. Free space is checked up front, but
    /// the pushes themselves are not atomic: should one fail anyway (a
    /// producer filled the ring in between), the bytes already pushed
    /// stay queued.
    pub fn add_message<F: Fifo + ?Sized>(
        &self,
        fifo: &mut F,
        message: &[u8],
    ) -> Result<(), FramingError> {
        let len = message.len();
        if !(MIN_MESSAGE_LEN..=MAX_MESSAGE_LEN).contains(&len) {
            return Err(FramingError::InvalidLength);
        }
        if fifo.free_space() < len {
            return Err(FramingError::InsufficientSpace);
        }

        for (i, &byte) in message.iter().enumerate() {
            fifo.push(byte).map_err(|_| {
                warn!("ring filled mid-message, {} of {} bytes queued", i, len);
                FramingError::InsufficientSpace
            })?;
        }
        Ok(())
    }

    /// Frame `payload` and queue it
    ///
    /// Returns the framed length.
    pub fn add_payload<F: Fifo + ?Sized>(
        &self,
        fifo: &mut F,
        payload: &[u8],
    ) -> Result<usize, FramingError> {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let len = encode_message(self.start, payload, &mut buffer)?;
        self.add_message(fifo, &buffer[..len])?;
        Ok(len)
    }

    /// Extract one message into `out`
    ///
    /// Returns the message length; `out[..len]` then holds the whole
    /// message, START and LENGTH included.
    pub fn get_message<F: Fifo + ?Sized>(
        &self,
        fifo: &mut F,
        out: &mut [u8],
    ) -> Result<usize, FramingError> {
        let start = fifo.pop().map_err(|_| FramingError::Empty)?;
        if start != self.start {
            debug!("discarded {=u8:#x}, expected start byte", start);
            return Err(FramingError::InvalidStart);
        }

        let length = fifo.pop().map_err(|_| FramingError::Incomplete)?;
        let len = usize::from(length);
        if len < MIN_MESSAGE_LEN {
            debug!("invalid message length {}", len);
            return Err(FramingError::InvalidLength);
        }
        if out.len() < len {
            return Err(FramingError::BufferTooSmall);
        }

        out[0] = start;
        out[1] = length;

        let mut sum = 0u8;
        for slot in &mut out[2..len] {
            *slot = fifo.pop().map_err(|_| {
                debug!("ring ran dry inside a {}-byte message", len);
                FramingError::Incomplete
            })?;
            sum ^= *slot;
        }

        if sum != 0 {
            debug!("checksum mismatch, residue {=u8:#x}", sum);
            return Err(FramingError::ChecksumMismatch);
        }

        Ok(len)
    }

    /// Extract one message into an owned buffer
    pub fn get_message_vec<F: Fifo + ?Sized>(&self, fifo: &mut F) -> Result<Message, FramingError> {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let len = self.get_message(fifo, &mut buffer)?;
        Message::from_slice(&buffer[..len]).map_err(|_| FramingError::BufferTooSmall)
    }

    /// Extract the next valid message, skipping over corrupt ones
    ///
    /// Calls [`get_message`](Self::get_message) until it succeeds or the
    /// ring runs out (`Empty` or `Incomplete`), returning `None` in the
    /// latter case. Bytes of an incomplete trailing message are lost like
    /// with any other failed extraction.
    pub fn poll<F: Fifo + ?Sized>(&self, fifo: &mut F, out: &mut [u8]) -> Option<usize> {
        loop {
            match self.get_message(fifo, out) {
                Ok(len) => return Some(len),
                Err(FramingError::Empty | FramingError::Incomplete) => return None,
                Err(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringframe_core::{RingBuffer, SharedRing};

    fn push_all(ring: &mut RingBuffer<'_>, bytes: &[u8]) {
        for &b in bytes {
            ring.push(b).unwrap();
        }
    }

    #[test]
    fn test_valid_message_extracted() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA, 0x04, 0x10, 0x10]);

        let framer = MessageFramer::new();
        let mut out = [0u8; 8];
        assert_eq!(framer.get_message(&mut ring, &mut out), Ok(4));
        assert_eq!(&out[..4], &[0xAA, 0x04, 0x10, 0x10]);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        // 0x10 ^ 0x14 = 0x04
        push_all(&mut ring, &[0xAA, 0x04, 0x10, 0x14]);

        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::ChecksumMismatch)
        );
        assert!(ring.is_empty());
    }

    #[test]
    fn test_empty_ring() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::Empty)
        );
    }

    #[test]
    fn test_invalid_start_consumes_byte() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0x55, 0xAA, 0x03, 0x00]);

        let framer = MessageFramer::new();
        let mut out = [0u8; 8];
        assert_eq!(
            framer.get_message(&mut ring, &mut out),
            Err(FramingError::InvalidStart)
        );
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.peek(0), Ok(0xAA));

        assert_eq!(framer.get_message(&mut ring, &mut out), Ok(3));
    }

    #[test]
    fn test_invalid_length() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA, 0x02, 0x00]);

        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::InvalidLength)
        );
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_incomplete_message_is_discarded() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA, 0x05, 0x01]);

        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::Incomplete)
        );
        assert!(ring.is_empty());
    }

    #[test]
    fn test_missing_length_is_incomplete() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA]);

        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::Incomplete)
        );
    }

    #[test]
    fn test_output_buffer_too_small() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA, 0x05, 0x01, 0x02, 0x03]);

        let mut out = [0u8; 4];
        assert_eq!(
            MessageFramer::new().get_message(&mut ring, &mut out),
            Err(FramingError::BufferTooSmall)
        );
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_add_message_rejects_short() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        assert_eq!(
            MessageFramer::new().add_message(&mut ring, &[0xAA, 0x02]),
            Err(FramingError::InvalidLength)
        );
        assert!(ring.is_empty());
    }

    #[test]
    fn test_add_message_rejects_overlong() {
        let mut storage = [0u8; 512];
        let mut ring = RingBuffer::new(&mut storage);
        let message = [0u8; MAX_MESSAGE_LEN + 1];
        assert_eq!(
            MessageFramer::new().add_message(&mut ring, &message),
            Err(FramingError::InvalidLength)
        );
    }

    #[test]
    fn test_add_message_checks_free_space() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0; 5]);

        // capacity is 8 but only 3 bytes are free
        assert_eq!(
            MessageFramer::new().add_message(&mut ring, &[0xAA, 0x04, 0x10, 0x10]),
            Err(FramingError::InsufficientSpace)
        );
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_add_message_ignores_overwrite_policy() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage);
        ring.set_overwrite(true);
        push_all(&mut ring, &[1, 2]);

        assert_eq!(
            MessageFramer::new().add_message(&mut ring, &[0xAA, 0x03, 0x00]),
            Err(FramingError::InsufficientSpace)
        );
        assert!(ring.iter().eq([1u8, 2]));
    }

    /// Ring that a second producer fills after `accepted` more pushes
    struct ContendedRing<'r, 'b> {
        ring: &'r mut RingBuffer<'b>,
        accepted: usize,
    }

    impl Fifo for ContendedRing<'_, '_> {
        fn push(&mut self, byte: u8) -> Result<(), ringframe_core::RingError> {
            if self.accepted == 0 {
                while !self.ring.is_full() {
                    self.ring.push(0xEE)?;
                }
            } else {
                self.accepted -= 1;
            }
            self.ring.push(byte)
        }

        fn pop(&mut self) -> Result<u8, ringframe_core::RingError> {
            self.ring.pop()
        }

        fn len(&self) -> usize {
            self.ring.len()
        }

        fn capacity(&self) -> usize {
            self.ring.capacity()
        }
    }

    #[test]
    fn test_add_message_keeps_partial_write() {
        let mut storage = [0u8; 6];
        let mut ring = RingBuffer::new(&mut storage);
        let mut contended = ContendedRing {
            ring: &mut ring,
            accepted: 2,
        };

        assert_eq!(
            MessageFramer::new().add_message(&mut contended, &[0xAA, 0x04, 0x10, 0x10]),
            Err(FramingError::InsufficientSpace)
        );
        // the two bytes pushed before the ring filled stay queued
        assert_eq!(ring.len(), 6);
        assert_eq!(ring.peek(0), Ok(0xAA));
        assert_eq!(ring.peek(1), Ok(0x04));
        assert!(ring.iter().skip(2).all(|b| b == 0xEE));
    }

    #[test]
    fn test_add_then_get_roundtrip() {
        let mut storage = [0u8; 16];
        let mut ring = RingBuffer::new(&mut storage);
        let framer = MessageFramer::new();
        let message = [0xAA, 0x06, 0x01, 0x02, 0x04, 0x07];

        framer.add_message(&mut ring, &message).unwrap();
        let mut out = [0u8; 16];
        let len = framer.get_message(&mut ring, &mut out).unwrap();
        assert_eq!(&out[..len], &message);
    }

    #[test]
    fn test_add_payload_frames_message() {
        let mut storage = [0u8; 16];
        let mut ring = RingBuffer::new(&mut storage);
        let framer = MessageFramer::with_start(0x7E);

        assert_eq!(framer.add_payload(&mut ring, &[0x01, 0x02]), Ok(5));
        let message = framer.get_message_vec(&mut ring).unwrap();
        assert_eq!(message.as_slice(), &[0x7E, 0x05, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_custom_start_rejects_default_marker() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0xAA, 0x03, 0x00]);

        let mut out = [0u8; 8];
        assert_eq!(
            MessageFramer::with_start(0x7E).get_message(&mut ring, &mut out),
            Err(FramingError::InvalidStart)
        );
    }

    #[test]
    fn test_poll_skips_garbage() {
        let mut storage = [0u8; 16];
        let mut ring = RingBuffer::new(&mut storage);
        push_all(&mut ring, &[0x00, 0x13, 0xAA, 0x04, 0x10, 0x14]);
        push_all(&mut ring, &[0xAA, 0x04, 0x22, 0x22]);

        let framer = MessageFramer::new();
        let mut out = [0u8; 8];
        assert_eq!(framer.poll(&mut ring, &mut out), Some(4));
        assert_eq!(&out[..4], &[0xAA, 0x04, 0x22, 0x22]);
        assert_eq!(framer.poll(&mut ring, &mut out), None);
    }

    #[test]
    fn test_shared_ring_extraction() {
        let mut storage = [0u8; 8];
        let shared = SharedRing::new(RingBuffer::new(&mut storage));
        for b in [0xAA, 0x04, 0x10, 0x10] {
            shared.push(b).unwrap();
        }

        let framer = MessageFramer::new();
        let message = framer.get_message_vec(&mut &shared).unwrap();
        assert_eq!(message.len(), 4);
        assert!(shared.is_empty());
    }
}
