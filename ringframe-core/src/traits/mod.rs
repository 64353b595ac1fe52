//! Byte queue abstraction
//!
//! Framing and transport code is written against [`Fifo`] so the same
//! logic runs on a plain ring owned by one context and on a
//! [`SharedRing`](crate::SharedRing) fed from an interrupt.

pub mod fifo;

pub use fifo::Fifo;
