//! Periodic diagnostic reporting
//!
//! The reporting side runs in the foreground, never inside the capture
//! interrupts. It takes a [`Snapshot`] on each tick and hands it to a sink.

use crate::diagnostics::Snapshot;

/// One numbered report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Tick counter of the reporting loop
    pub sequence: u32,
    /// Sniffer state at this tick
    pub snapshot: Snapshot,
}

/// Destination for diagnostic reports (log, serial console, ...)
pub trait ReportSink {
    /// Deliver one report
    fn report(&mut self, report: &Report);
}

/// Numbers snapshots and forwards them to a sink
#[derive(Debug)]
pub struct Reporter<S> {
    sink: S,
    sequence: u32,
}

impl<S: ReportSink> Reporter<S> {
    /// Create a reporter starting at sequence 0
    pub fn new(sink: S) -> Self {
        Self { sink, sequence: 0 }
    }

    /// Emit the report for one tick
    pub fn tick(&mut self, snapshot: Snapshot) {
        let report = Report {
            sequence: self.sequence,
            snapshot,
        };
        self.sink.report(&report);
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Sequence number of the next report
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Shared access to the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
