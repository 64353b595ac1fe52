//! Ringframe Hardware Abstraction Layer
//!
//! Byte transport traits sitting at the edge of the ring buffer. A chip
//! HAL implements them for its UART peripheral; `ringframe-protocol`
//! consumes them to move bytes between the wire and a ring.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (message handling)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ringframe-protocol (framer, link)      │
//! └─────────────────────────────────────────┘
//!         │                       │
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ ringframe-core│       │ ringframe-hal │
//! │  (byte ring)  │       │   (traits)    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{Uart, UartRx, UartTx};
