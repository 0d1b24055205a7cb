//! RP2040 capture hardware for the spisniff bus sniffer
//!
//! This crate provides RP2040 implementations of the `spisniff-hal`
//! traits:
//!
//! - PIO-based passive SPI receiver (never drives a pin)
//! - Two chained DMA channels as the ping-pong transfer engine
//!   (implements `spisniff_hal::TransferEngine`)
//! - Chip-select falling-edge latch (implements `spisniff_hal::BoundarySignal`)
//!
//! ```text
//!   MOSI/SCK ──► PIO SM ──► RX FIFO ──► DMA A ──► half 0 ─┐
//!                                   └─► DMA B ──► half 1 ─┤ chained
//!   CS ──────► IO_BANK0 edge latch                         └─► DMA_IRQ_1
//! ```

#![no_std]

pub mod boundary;
pub mod dma;
pub mod pio;

pub use boundary::ChipSelectEdge;
pub use dma::{CaptureBuffer, Completed, PingPongDma, DMA_IRQ_INDEX};
pub use pio::{CapturePio, RxSource, SpiCapture};

// Re-export shared traits from spisniff-hal for convenience
pub use spisniff_hal::{BoundarySignal, Half, TransferEngine};
