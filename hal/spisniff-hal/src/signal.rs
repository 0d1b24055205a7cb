//! Transaction boundary signal
//!
//! The chip-select line marks the start (and so the end) of each bus
//! transaction. The hardware latches an edge; software polls and clears it.

/// Latched transaction-boundary event
pub trait BoundarySignal {
    /// Check whether a boundary edge is pending and clear it
    ///
    /// Returns `true` exactly once per latched edge.
    fn pending_and_acknowledge(&mut self) -> bool;
}
