//! Periodic diagnostic report
//!
//! Takes a snapshot inside a short critical section and logs it outside.

use defmt::*;
use embassy_time::{Duration, Ticker};
use spisniff_core::{DecoderState, Report, ReportSink, Reporter};

use crate::capture;

/// Prints reports over defmt
pub struct DefmtSink;

impl ReportSink for DefmtSink {
    fn report(&mut self, report: &Report) {
        let snapshot = &report.snapshot;
        info!(
            "#{} head={} boundaries={} errors={} state={} last_error={}",
            report.sequence,
            snapshot.head,
            snapshot.boundary_events,
            snapshot.errors,
            snapshot.state.label(),
            snapshot.last_error.as_ref().map(DecoderState::label)
        );
    }
}

/// Report task - one report every `interval_ms`
#[embassy_executor::task]
pub async fn report_task(interval_ms: u32) {
    info!("Report task started ({} ms)", interval_ms);

    let mut reporter = Reporter::new(DefmtSink);
    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        ticker.next().await;

        match capture::with_sniffer(|sniffer| sniffer.snapshot()) {
            Some(snapshot) => reporter.tick(snapshot),
            None => warn!("Sniffer not installed"),
        }
    }
}
