//! Sniffer context and interrupt handlers
//!
//! One [`Sniffer`] owns the capture ring, the decoder, the framebuffer and
//! the diagnostic counters. Each interrupt handler gets `&mut Sniffer` for
//! the duration of its run and nothing else touches these entities.

use spisniff_hal::{BoundarySignal, Half, TransferEngine};
use spisniff_protocol::{Decoder, DecoderState, Framebuffer};

use crate::config::{ConfigError, SnifferConfig};
use crate::diagnostics::{Diagnostics, Snapshot};
use crate::ring::CaptureRing;

/// Passive bus sniffer decoding into a `ROW_BYTES` x `ROWS` bitmap
#[derive(Debug)]
pub struct Sniffer<E, const ROW_BYTES: usize, const ROWS: usize> {
    ring: CaptureRing<E>,
    decoder: Decoder,
    framebuffer: Framebuffer<ROW_BYTES, ROWS>,
    diagnostics: Diagnostics,
    config: SnifferConfig,
}

impl<E: TransferEngine, const ROW_BYTES: usize, const ROWS: usize> Sniffer<E, ROW_BYTES, ROWS> {
    /// Create a sniffer over `engine`
    ///
    /// Capture does not begin until [`Sniffer::start`].
    pub fn new(engine: E, config: SnifferConfig) -> Result<Self, ConfigError> {
        config.validate::<ROW_BYTES, ROWS>()?;
        if E::HALF_CAPACITY == 0 {
            return Err(ConfigError::EmptyRing);
        }

        Ok(Self {
            ring: CaptureRing::new(engine),
            decoder: Decoder::new(config.geometry.row_limit()),
            framebuffer: Framebuffer::new(),
            diagnostics: Diagnostics::new(),
            config,
        })
    }

    /// Arm both ring halves
    pub fn start(&mut self) {
        self.ring.start();
    }

    /// Half-complete interrupt handler
    ///
    /// `half` is the half the engine just finished.
    pub fn on_half_complete(&mut self, half: Half) {
        let Self {
            ring,
            decoder,
            framebuffer,
            ..
        } = self;
        ring.complete_half(half, |byte| decoder.feed(byte, framebuffer));
    }

    /// Transaction-boundary handler
    ///
    /// Decodes everything captured up to this edge, then closes the
    /// transaction and returns the decoder to `Idle`.
    pub fn on_boundary(&mut self) {
        let Self {
            ring,
            decoder,
            framebuffer,
            diagnostics,
            ..
        } = self;

        let position = ring.boundary_position();
        ring.drain_to(position, |byte| decoder.feed(byte, framebuffer));

        if decoder.end_transaction().is_some() {
            diagnostics.record_incomplete();
        }
        diagnostics.record_boundary();
    }

    /// Run the boundary handler if `signal` has a latched edge
    ///
    /// Returns `true` when an edge was consumed.
    pub fn on_boundary_irq(&mut self, signal: &mut impl BoundarySignal) -> bool {
        if !signal.pending_and_acknowledge() {
            return false;
        }
        self.on_boundary();
        true
    }

    /// Capture ring cursors
    pub fn ring(&self) -> &CaptureRing<E> {
        &self.ring
    }

    /// Shared access to the transfer engine
    pub fn engine(&self) -> &E {
        self.ring.engine()
    }

    /// Exclusive access to the transfer engine
    pub fn engine_mut(&mut self) -> &mut E {
        self.ring.engine_mut()
    }

    /// Decoded image
    pub fn framebuffer(&self) -> &Framebuffer<ROW_BYTES, ROWS> {
        &self.framebuffer
    }

    /// Counters
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Current decoder state
    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// State in which the most recent error was detected
    pub fn last_error_state(&self) -> Option<DecoderState> {
        self.decoder.last_error()
    }

    /// Configuration this sniffer was built with
    pub fn config(&self) -> &SnifferConfig {
        &self.config
    }

    /// Copy of everything the reporting loop shows
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            head: self.ring.head(),
            boundary_events: self.diagnostics.boundary_events(),
            errors: self.diagnostics.incomplete_transactions(),
            last_error: self.decoder.last_error(),
            state: self.decoder.state(),
        }
    }
}
