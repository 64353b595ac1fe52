//! Read-only diagnostic capture of a ring

use core::fmt;

use heapless::Vec;

use super::{RingBuffer, WatermarkState};

/// Occupancy and contents of a ring at one instant
///
/// Holds at most `N` bytes, oldest first. Taking a snapshot never
/// changes the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<const N: usize> {
    /// Ring capacity
    pub capacity: usize,
    /// Bytes stored at capture time
    pub len: usize,
    /// Next write slot
    pub head: usize,
    /// Next read slot
    pub tail: usize,
    /// Overwrite policy at capture time
    pub overwrite: bool,
    /// Fill level against the watermarks
    pub watermark: WatermarkState,
    /// Buffered bytes, oldest first
    pub bytes: Vec<u8, N>,
    /// `len` exceeded `N`; only the oldest `N` bytes were kept
    pub truncated: bool,
}

impl<const N: usize> Snapshot<N> {
    pub(super) fn capture(ring: &RingBuffer<'_>) -> Self {
        let mut bytes = Vec::new();
        let mut truncated = false;
        for byte in ring.iter() {
            if bytes.push(byte).is_err() {
                truncated = true;
                break;
            }
        }

        Self {
            capacity: ring.capacity(),
            len: ring.len(),
            head: ring.head(),
            tail: ring.tail(),
            overwrite: ring.overwrite_enabled(),
            watermark: ring.check_watermarks(),
            bytes,
            truncated,
        }
    }
}

impl<const N: usize> fmt::Display for Snapshot<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Size: {}, Count: {}, Head: {}, Tail: {}",
            self.capacity, self.len, self.head, self.tail
        )?;
        for (i, byte) in self.bytes.iter().enumerate() {
            writeln!(f, "Index {}: {:02X}", i, byte)?;
        }
        if self.truncated {
            writeln!(f, "... {} more", self.len - self.bytes.len())?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Snapshot<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Ring[size={}, count={}, head={}, tail={}, {}] {=[u8]:x}",
            self.capacity,
            self.len,
            self.head,
            self.tail,
            self.watermark,
            self.bytes.as_slice()
        );
        if self.truncated {
            defmt::write!(f, " (+{})", self.len - self.bytes.len());
        }
    }
}
