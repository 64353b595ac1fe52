//! Ring buffer storage and single-context operations
//!
//! The methods here take `&mut self` and do no locking. A ring shared
//! between an interrupt handler and a task must go through
//! [`SharedRing`](super::SharedRing) instead; calling these from two
//! execution contexts at once is a caller contract violation.

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

use super::{RingError, Snapshot, WatermarkState};

#[cfg(feature = "alloc")]
use super::AllocationError;

/// Backing bytes of a ring
#[derive(Debug)]
enum Storage<'a> {
    /// Caller-owned region, borrowed for the ring's lifetime
    Borrowed(&'a mut [u8]),
    /// Heap region acquired by [`RingBuffer::with_capacity`]
    #[cfg(feature = "alloc")]
    Owned(Box<[u8]>),
}

impl Storage<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Borrowed(bytes) => &bytes[..],
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => &bytes[..],
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Borrowed(bytes) => &mut bytes[..],
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => &mut bytes[..],
        }
    }
}

/// Fixed-capacity FIFO of bytes
///
/// Capacity is fixed at construction. When full, [`push`](Self::push)
/// either refuses the byte or, with overwrite enabled, discards the
/// oldest byte to make room.
#[derive(Debug)]
pub struct RingBuffer<'a> {
    storage: Storage<'a>,
    /// Capacity, equal to the storage length
    size: usize,
    /// Next write slot
    head: usize,
    /// Next read slot
    tail: usize,
    /// Valid bytes currently stored
    count: usize,
    high_watermark: usize,
    low_watermark: usize,
    overwrite: bool,
}

impl<'a> RingBuffer<'a> {
    /// Create a ring over caller-provided storage
    ///
    /// Capacity is the slice length. Watermarks default to 75% (high) and
    /// 25% (low) of capacity; overwrite starts disabled. Usable in const
    /// context, so a ring over a static buffer needs no runtime setup.
    pub const fn new(storage: &'a mut [u8]) -> Self {
        let size = storage.len();
        Self {
            storage: Storage::Borrowed(storage),
            size,
            head: 0,
            tail: 0,
            count: 0,
            high_watermark: size - size / 4,
            low_watermark: size / 4,
            overwrite: false,
        }
    }

    /// Create a ring over the first `size` bytes of `storage`
    ///
    /// A `size` beyond the slice is clamped to the slice length.
    pub fn with_size(storage: &'a mut [u8], size: usize) -> Self {
        let size = size.min(storage.len());
        Self::new(&mut storage[..size])
    }

    /// Release the ring and its storage
    ///
    /// Heap storage from [`with_capacity`](RingBuffer::with_capacity) is
    /// freed exactly once here; borrowed storage is handed back to its
    /// owner. The ring cannot be used afterwards.
    pub fn free(self) {
        debug!("releasing ring of {} bytes", self.size);
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        self.size
    }

    /// Number of bytes currently stored
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Bytes that can be pushed before the ring is full
    pub const fn free_space(&self) -> usize {
        self.size - self.count
    }

    /// Index of the next write slot
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Index of the next read slot
    pub const fn tail(&self) -> usize {
        self.tail
    }

    /// Check if no bytes are stored
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if every slot holds a byte
    pub const fn is_full(&self) -> bool {
        self.count == self.size
    }

    /// Empty the ring
    ///
    /// Stored bytes are not erased, only made unreachable.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Push a byte
    ///
    /// On a full ring this fails with [`RingError::Full`] and changes
    /// nothing, unless overwrite is enabled, in which case the oldest byte
    /// is discarded and the push succeeds.
    pub fn push(&mut self, byte: u8) -> Result<(), RingError> {
        self.insert(byte, self.overwrite)
    }

    /// Push a byte, discarding the oldest one if the ring is full
    ///
    /// Ignores the overwrite setting. A zero-capacity ring drops the byte.
    pub fn push_overwrite(&mut self, byte: u8) {
        let _ = self.insert(byte, true);
    }

    fn insert(&mut self, byte: u8, overwrite: bool) -> Result<(), RingError> {
        if self.is_full() {
            if !overwrite || self.size == 0 {
                return Err(RingError::Full);
            }
            self.tail = self.advance(self.tail);
            trace!("ring full, oldest byte overwritten");
        } else {
            self.count += 1;
        }

        let head = self.head;
        self.storage.as_mut_slice()[head] = byte;
        self.head = self.advance(head);
        Ok(())
    }

    /// Pop the oldest byte
    pub fn pop(&mut self) -> Result<u8, RingError> {
        if self.count == 0 {
            return Err(RingError::Empty);
        }
        let byte = self.storage.as_slice()[self.tail];
        self.tail = self.advance(self.tail);
        self.count -= 1;
        Ok(byte)
    }

    /// Read the byte `index` positions after the oldest, without removing it
    pub fn peek(&self, index: usize) -> Result<u8, RingError> {
        if index >= self.count {
            return Err(RingError::OutOfRange);
        }
        Ok(self.storage.as_slice()[self.physical(index)])
    }

    /// Iterate over stored bytes, oldest first, without consuming them
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: &self.storage.as_slice()[..self.size],
            pos: self.tail,
            remaining: self.count,
        }
    }

    /// Enable or disable overwrite-on-full for subsequent pushes
    pub fn set_overwrite(&mut self, enable: bool) {
        self.overwrite = enable;
    }

    /// Whether pushes onto a full ring discard the oldest byte
    pub const fn overwrite_enabled(&self) -> bool {
        self.overwrite
    }

    /// High watermark threshold
    pub const fn high_watermark(&self) -> usize {
        self.high_watermark
    }

    /// Low watermark threshold
    pub const fn low_watermark(&self) -> usize {
        self.low_watermark
    }

    /// Set both watermark thresholds
    ///
    /// Each must lie in `0..=capacity`; otherwise neither is changed.
    /// Their relative order is not checked.
    pub fn set_watermarks(&mut self, high: usize, low: usize) -> Result<(), RingError> {
        if high > self.size || low > self.size {
            return Err(RingError::OutOfRange);
        }
        self.high_watermark = high;
        self.low_watermark = low;
        Ok(())
    }

    /// Compare the fill level against the watermarks
    pub const fn check_watermarks(&self) -> WatermarkState {
        WatermarkState::classify(self.count, self.high_watermark, self.low_watermark)
    }

    /// Capture occupancy and up to `N` buffered bytes for diagnostics
    pub fn snapshot<const N: usize>(&self) -> Snapshot<N> {
        Snapshot::capture(self)
    }

    /// Next index after `idx`, wrapping at capacity
    const fn advance(&self, idx: usize) -> usize {
        let next = idx + 1;
        if next >= self.size {
            0
        } else {
            next
        }
    }

    /// Physical slot of logical position `index` (`index < count`)
    const fn physical(&self, index: usize) -> usize {
        let pos = self.tail + index;
        if pos >= self.size {
            pos - self.size
        } else {
            pos
        }
    }
}

#[cfg(feature = "alloc")]
impl RingBuffer<'static> {
    /// Create a ring with heap storage of `size` bytes
    ///
    /// Watermarks default to `size - 1` (high) and `1` (low), both
    /// clamped to capacity. Release the storage with
    /// [`free`](RingBuffer::free).
    pub fn with_capacity(size: usize) -> Result<Self, AllocationError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(size).map_err(|_| {
            warn!("failed to allocate {} bytes of ring storage", size);
            AllocationError
        })?;
        bytes.resize(size, 0);

        Ok(Self {
            storage: Storage::Owned(bytes.into_boxed_slice()),
            size,
            head: 0,
            tail: 0,
            count: 0,
            high_watermark: size.saturating_sub(1),
            low_watermark: size.min(1),
            overwrite: false,
        })
    }
}

/// Iterator over the bytes of a [`RingBuffer`], oldest first
#[derive(Debug, Clone)]
pub struct Iter<'b> {
    bytes: &'b [u8],
    pos: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let byte = self.bytes[self.pos];
        self.pos += 1;
        if self.pos == self.bytes.len() {
            self.pos = 0;
        }
        self.remaining -= 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'r> IntoIterator for &'r RingBuffer<'_> {
    type Item = u8;
    type IntoIter = Iter<'r>;

    fn into_iter(self) -> Iter<'r> {
        self.iter()
    }
}
