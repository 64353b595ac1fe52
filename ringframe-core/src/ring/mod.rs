//! Fixed-capacity circular byte store
//!
//! Occupancy is tracked with an explicit counter. `head == tail` holds both
//! for an empty ring and for a completely full one, so the indices alone
//! never decide emptiness.
//!
//! ```text
//!        tail            head
//!         │               │
//!  ┌───┬──▼┬───┬───┬───┬──▼┬───┬───┐
//!  │   │ a │ b │ c │ d │   │   │   │   count = 4
//!  └───┴───┴───┴───┴───┴───┴───┴───┘
//! ```
//!
//! Logical position `i` lives at physical index `(tail + i) mod size`.

mod buffer;
mod shared;
mod snapshot;
mod watermark;

pub use buffer::{Iter, RingBuffer};
pub use shared::SharedRing;
pub use snapshot::Snapshot;
pub use watermark::WatermarkState;

use core::fmt;

/// Errors reported by ring operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingError {
    /// Push refused: ring is full and overwrite is disabled
    Full,
    /// Pop on an empty ring
    Empty,
    /// Index or threshold outside the valid range
    OutOfRange,
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::Full => f.write_str("ring buffer full"),
            RingError::Empty => f.write_str("ring buffer empty"),
            RingError::OutOfRange => f.write_str("index out of range"),
        }
    }
}

impl core::error::Error for RingError {}

/// Heap storage for a dynamically sized ring could not be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocationError;

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring buffer storage allocation failed")
    }
}

impl core::error::Error for AllocationError {}
