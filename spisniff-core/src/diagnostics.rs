//! Diagnostic counters
//!
//! Written only by the boundary monitor, read by the reporting loop.
//! Counters wrap; they are for display, not accounting.

use spisniff_protocol::DecoderState;

/// Running counters kept by the sniffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    boundary_events: u32,
    incomplete_transactions: u32,
}

impl Diagnostics {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            boundary_events: 0,
            incomplete_transactions: 0,
        }
    }

    /// Chip-select edges seen
    pub fn boundary_events(&self) -> u32 {
        self.boundary_events
    }

    /// Transactions that ended without a clean terminator
    pub fn incomplete_transactions(&self) -> u32 {
        self.incomplete_transactions
    }

    pub(crate) fn record_boundary(&mut self) {
        self.boundary_events = self.boundary_events.wrapping_add(1);
    }

    pub(crate) fn record_incomplete(&mut self) {
        self.incomplete_transactions = self.incomplete_transactions.wrapping_add(1);
    }
}

/// Point-in-time view of the sniffer for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Last ring position handed to the decoder
    pub head: usize,
    /// Chip-select edges seen
    pub boundary_events: u32,
    /// Transactions that ended without a clean terminator
    pub errors: u32,
    /// State the most recent error was detected in
    pub last_error: Option<DecoderState>,
    /// Current decoder state
    pub state: DecoderState,
}
