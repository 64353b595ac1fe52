//! Fifo trait and implementations for the ring types

use crate::ring::{RingBuffer, RingError, SharedRing};

/// A bounded first-in first-out byte queue
///
/// Implementations on shared rings take one critical section per call,
/// so a caller moving a whole message never masks interrupts for longer
/// than a single byte.
pub trait Fifo {
    /// Append a byte, honouring the queue's full policy
    fn push(&mut self, byte: u8) -> Result<(), RingError>;

    /// Remove the oldest byte
    fn pop(&mut self) -> Result<u8, RingError>;

    /// Bytes currently queued
    fn len(&self) -> usize;

    /// Total capacity
    fn capacity(&self) -> usize;

    /// Bytes that can be pushed before the queue is full
    fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Check if nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Fifo for RingBuffer<'_> {
    fn push(&mut self, byte: u8) -> Result<(), RingError> {
        RingBuffer::push(self, byte)
    }

    fn pop(&mut self) -> Result<u8, RingError> {
        RingBuffer::pop(self)
    }

    fn len(&self) -> usize {
        RingBuffer::len(self)
    }

    fn capacity(&self) -> usize {
        RingBuffer::capacity(self)
    }

    fn free_space(&self) -> usize {
        RingBuffer::free_space(self)
    }

    fn is_empty(&self) -> bool {
        RingBuffer::is_empty(self)
    }
}

impl Fifo for &SharedRing<'_> {
    fn push(&mut self, byte: u8) -> Result<(), RingError> {
        SharedRing::push(self, byte)
    }

    fn pop(&mut self) -> Result<u8, RingError> {
        SharedRing::pop(self)
    }

    fn len(&self) -> usize {
        SharedRing::len(self)
    }

    fn capacity(&self) -> usize {
        SharedRing::capacity(self)
    }

    // One critical section, so capacity and len come from the same instant
    fn free_space(&self) -> usize {
        SharedRing::free_space(self)
    }
}

impl Fifo for SharedRing<'_> {
    fn push(&mut self, byte: u8) -> Result<(), RingError> {
        SharedRing::push(self, byte)
    }

    fn pop(&mut self) -> Result<u8, RingError> {
        SharedRing::pop(self)
    }

    fn len(&self) -> usize {
        SharedRing::len(self)
    }

    fn capacity(&self) -> usize {
        SharedRing::capacity(self)
    }

    fn free_space(&self) -> usize {
        SharedRing::free_space(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<F: Fifo>(fifo: &mut F, out: &mut [u8]) -> usize {
        let mut n = 0;
        while let Ok(byte) = fifo.pop() {
            out[n] = byte;
            n += 1;
        }
        n
    }

    #[test]
    fn test_ring_through_trait() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage);
        Fifo::push(&mut ring, 1).unwrap();
        Fifo::push(&mut ring, 2).unwrap();
        assert_eq!(Fifo::free_space(&ring), 2);

        let mut out = [0u8; 4];
        assert_eq!(drain(&mut ring, &mut out), 2);
        assert_eq!(&out[..2], &[1, 2]);
        assert!(Fifo::is_empty(&ring));
    }

    #[test]
    fn test_shared_ref_through_trait() {
        let mut storage = [0u8; 3];
        let shared = SharedRing::new(RingBuffer::new(&mut storage));
        let producer = &shared;
        for b in [7, 8, 9] {
            producer.push(b).unwrap();
        }
        assert_eq!(producer.push(10), Err(RingError::Full));

        let mut consumer = &shared;
        let mut out = [0u8; 3];
        assert_eq!(drain(&mut consumer, &mut out), 3);
        assert_eq!(out, [7, 8, 9]);
    }
}
