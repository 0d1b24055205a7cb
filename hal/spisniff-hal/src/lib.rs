//! spisniff Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware capabilities the sniffer
//! core needs. Chip-specific crates implement them; the core and its tests
//! only ever see these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  spisniff-core (ring, decoder, monitor) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spisniff-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ spisniff-hal- │       │    SimDma     │
//! │    rp2040     │       │ (core, tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`dma::TransferEngine`] - Ping-pong capture engine
//! - [`signal::BoundarySignal`] - Transaction boundary (chip-select) latch

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod signal;

// Re-export key traits at crate root for convenience
pub use dma::{Half, TransferEngine};
pub use signal::BoundarySignal;
