//! Screen update protocol
//!
//! This crate defines the row-oriented image update protocol observed on
//! the sniffed bus, the decoder state machine, and the bitmap it fills.
//!
//! # Protocol Overview
//!
//! One bus transaction (one chip-select period) carries zero or more rows:
//! ```text
//! ┌──────┬─────┬──────────────────┬──────┬─────┬─────────┬──────┬──────┐
//! │ 0x80 │ ROW │ DATA[row_bytes]  │ 0xFF │ ROW │ ...     │ 0xFF │ 0xFF │
//! │ 1B   │ 1B  │ ceil(width/8) B  │ 1B   │ 1B  │         │ 1B   │ 1B   │
//! └──────┴─────┴──────────────────┴──────┴─────┴─────────┴──────┴──────┘
//! ```
//!
//! Row numbers are 1-based. A transaction with no rows is `0x80, 0xFF`.
//! The decoder never resynchronises on its own; only a transaction boundary
//! returns it to [`DecoderState::Idle`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod decoder;
pub mod framebuffer;
pub mod geometry;
pub mod state;
pub mod wire;

pub use decoder::Decoder;
pub use framebuffer::{Framebuffer, FramebufferError};
pub use geometry::ScreenGeometry;
pub use state::DecoderState;
pub use wire::{EncodeError, TransactionBuilder, ROW_MARKER, START_MARKER};
