//! Ring access from interrupt and task context
//!
//! Each operation runs inside its own `critical_section::with`, which
//! saves the interrupt-enable state on entry and restores it on exit, so
//! calls nest safely inside handlers or other critical sections. Keep the
//! work per section to a single push or pop; interrupts stay masked for
//! its whole duration.
//!
//! ```ignore
//! static RX: StaticCell<[u8; 128]> = StaticCell::new();
//! let ring = SharedRing::new(RingBuffer::new(RX.init([0; 128])));
//!
//! // UART receive interrupt
//! let _ = ring.push(byte);
//!
//! // polling task
//! while let Ok(byte) = ring.pop() { /* ... */ }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use super::{RingBuffer, RingError};

/// A [`RingBuffer`] shared between one producer and one consumer context
///
/// `SharedRing` is `Sync` and can be placed in a `static`. It provides
/// mutual exclusion by masking interrupts, not by locking, so there is
/// nothing to wait on and nothing to deadlock.
pub struct SharedRing<'a> {
    inner: Mutex<RefCell<RingBuffer<'a>>>,
}

impl<'a> SharedRing<'a> {
    /// Wrap a ring for cross-context access
    pub const fn new(ring: RingBuffer<'a>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ring)),
        }
    }

    /// [`RingBuffer::push`] inside a critical section
    pub fn push(&self, byte: u8) -> Result<(), RingError> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).push(byte))
    }

    /// [`RingBuffer::push_overwrite`] inside a critical section
    pub fn push_overwrite(&self, byte: u8) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).push_overwrite(byte))
    }

    /// [`RingBuffer::pop`] inside a critical section
    pub fn pop(&self) -> Result<u8, RingError> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).pop())
    }

    /// Number of bytes currently stored
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).len())
    }

    /// Check if no bytes are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).capacity())
    }

    /// Bytes that can be pushed before the ring is full
    pub fn free_space(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).free_space())
    }

    /// Run `f` on the ring inside one critical section
    ///
    /// Meant for short compound reads such as a snapshot or watermark
    /// check. Calling back into this `SharedRing` from `f` panics.
    pub fn with<R>(&self, f: impl FnOnce(&mut RingBuffer<'a>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Exclusive access without a critical section
    ///
    /// Holding `&mut self` already proves no other context can reach the ring.
    pub fn get_mut(&mut self) -> &mut RingBuffer<'a> {
        self.inner.get_mut().get_mut()
    }

    /// Unwrap the ring
    pub fn into_inner(self) -> RingBuffer<'a> {
        self.inner.into_inner().into_inner()
    }
}
