//! Board-agnostic core of the spisniff bus sniffer
//!
//! This crate contains everything between the capture hardware and the
//! decoded image that does not depend on a specific chip:
//!
//! - Ping-pong capture ring cursors and the remaining-count tie-break
//! - The sniffer context shared by the two interrupt handlers
//! - Diagnostic counters and report snapshots
//! - Configuration validation
//! - A software transfer engine for host tests
//!
//! # Execution model
//!
//! Two interrupt sources drive the core: the transfer engine's
//! half-complete interrupt ([`Sniffer::on_half_complete`]) and the
//! chip-select edge ([`Sniffer::on_boundary`]). They must never run
//! concurrently with each other. On a single core with both sources at the
//! same priority that holds by construction; otherwise wrap the
//! [`Sniffer`] in a critical-section mutex, as the RP2040 firmware does.
//! There is no backpressure: if the handlers fall a whole ring lap behind
//! the engine, captured bytes are overwritten unnoticed.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod diagnostics;
pub mod report;
pub mod ring;
#[cfg(test)]
mod sim;
pub mod sniffer;

pub use config::{ConfigError, SnifferConfig};
pub use diagnostics::{Diagnostics, Snapshot};
pub use report::{Report, ReportSink, Reporter};
pub use ring::{captured_from_remaining, CaptureRing};
pub use sniffer::Sniffer;

pub use spisniff_hal::{BoundarySignal, Half, TransferEngine};
pub use spisniff_protocol::{DecoderState, Framebuffer, ScreenGeometry};
