//! Framed messages over a byte ring
//!
//! A receive interrupt pushes raw bytes into a ring; a polling task calls
//! [`MessageFramer::get_message`] to pull whole, checksum-validated
//! messages back out.
//!
//! # Message Format
//!
//! ```text
//! ┌───────┬────────┬─────────────┬──────────┐
//! │ START │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 0–252B      │ 1B       │
//! └───────┴────────┴─────────────┴──────────┘
//! ```
//!
//! LENGTH counts every byte of the message, START and CHECKSUM included.
//! The XOR of everything after LENGTH, checksum included, must be zero.
//!
//! Extraction is not resumable: a failed attempt discards the bytes it
//! consumed, and a stream that lost sync recovers only once a START byte
//! reaches the front of the ring again.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod frame;
pub mod framer;
pub mod link;

pub use frame::{
    checksum, encode_message, FramingError, Message, MAX_MESSAGE_LEN, MESSAGE_START,
    MIN_MESSAGE_LEN,
};
pub use framer::MessageFramer;
pub use link::{receive, transmit, RxStats};
