//! Board-agnostic byte ring for interrupt-fed receive paths
//!
//! This crate contains the storage side of the UART pipeline:
//!
//! - [`RingBuffer`]: fixed-capacity circular byte store with an explicit
//!   occupancy counter, optional overwrite-on-full and watermark detection
//! - [`SharedRing`]: critical-section wrapper for sharing one ring between
//!   an interrupt handler and a polling task
//! - [`Fifo`]: the byte queue seam that framing code is generic over
//! - Ring configuration (postcard persistence behind the `serde` feature)
//!   and diagnostic snapshots
//!
//! No operation blocks or allocates once the ring exists. Heap-backed
//! rings are available behind the `alloc` feature.

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod ring;
pub mod traits;

pub use config::{ConfigError, RingConfig};
pub use ring::{
    AllocationError, Iter, RingBuffer, RingError, SharedRing, Snapshot, WatermarkState,
};
pub use traits::Fifo;
