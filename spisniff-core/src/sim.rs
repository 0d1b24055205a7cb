//! Software stand-ins for the capture hardware
//!
//! [`SimDma`] behaves like a ping-pong DMA channel pair with an n-minus-1
//! terminal-count register. Tests push wire bytes into it and decide when
//! the interrupt handlers run.

use spisniff_hal::{BoundarySignal, Half, TransferEngine};

use crate::sniffer::Sniffer;

/// Simulated two-half transfer engine
#[derive(Debug, Clone)]
pub struct SimDma<const H: usize> {
    memory: [[u8; H]; 2],
    written: [usize; 2],
    armed: [bool; 2],
    /// Half the engine writes into next
    current: Half,
    /// Bytes lost because the current half was not armed
    dropped: usize,
    arm_count: usize,
}

impl<const H: usize> Default for SimDma<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const H: usize> SimDma<H> {
    /// Create an engine with both halves idle and unarmed
    pub const fn new() -> Self {
        Self {
            memory: [[0; H]; 2],
            written: [0; 2],
            armed: [false; 2],
            current: Half::Primary,
            dropped: 0,
            arm_count: 0,
        }
    }

    /// Capture one byte off the bus
    ///
    /// Returns the half that just completed, which is when the hardware
    /// would raise its half-complete interrupt.
    pub fn push(&mut self, byte: u8) -> Option<Half> {
        let half = self.current;
        let i = half.index();

        if !self.armed[i] {
            self.dropped += 1;
            return None;
        }

        self.memory[i][self.written[i]] = byte;
        self.written[i] += 1;

        if self.written[i] == H {
            self.armed[i] = false;
            self.current = half.other();
            return Some(half);
        }
        None
    }

    /// Capture a run of bytes without anyone servicing the interrupts
    ///
    /// Returns the last half that completed during the run.
    pub fn push_all(&mut self, bytes: &[u8]) -> Option<Half> {
        bytes.iter().fold(None, |pending, &byte| self.push(byte).or(pending))
    }

    /// Check whether a half will accept bytes
    pub fn is_armed(&self, half: Half) -> bool {
        self.armed[half.index()]
    }

    /// Half the engine writes into next
    pub fn current(&self) -> Half {
        self.current
    }

    /// Bytes lost to capture overrun
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of `arm` calls so far
    pub fn arm_count(&self) -> usize {
        self.arm_count
    }
}

impl<const H: usize> TransferEngine for SimDma<H> {
    const HALF_CAPACITY: usize = H;

    fn arm(&mut self, half: Half) {
        self.written[half.index()] = 0;
        self.armed[half.index()] = true;
        self.arm_count += 1;
    }

    fn remaining_count(&self, half: Half) -> u32 {
        let written = self.written[half.index()];
        if written >= H {
            0
        } else {
            (H - 1 - written) as u32
        }
    }

    fn read(&self, half: Half, offset: usize) -> u8 {
        self.memory[half.index()][offset]
    }
}

/// Latched boundary flag
#[derive(Debug, Clone, Copy, Default)]
pub struct SimBoundary {
    pending: bool,
}

impl SimBoundary {
    /// Latch an edge
    pub fn latch(&mut self) {
        self.pending = true;
    }
}

impl BoundarySignal for SimBoundary {
    fn pending_and_acknowledge(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}

impl<const H: usize, const ROW_BYTES: usize, const ROWS: usize> Sniffer<SimDma<H>, ROW_BYTES, ROWS> {
    /// Capture `bytes`, servicing every half-complete interrupt at once
    pub fn capture(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(half) = self.engine_mut().push(byte) {
                self.on_half_complete(half);
            }
        }
    }

    /// Capture `bytes` without servicing half-complete interrupts
    ///
    /// Returns the last half that completed; earlier completions in the
    /// same run are lost, as a starved interrupt would be.
    pub fn capture_unserviced(&mut self, bytes: &[u8]) -> Option<Half> {
        self.engine_mut().push_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_counts_down() {
        let mut dma = SimDma::<4>::new();
        dma.arm(Half::Primary);
        dma.arm(Half::Alternate);
        assert_eq!(dma.remaining_count(Half::Primary), 3);
        dma.push(0);
        assert_eq!(dma.remaining_count(Half::Primary), 2);
        dma.push(0);
        dma.push(0);
        // One transfer left reads the same as complete
        assert_eq!(dma.remaining_count(Half::Primary), 0);
        assert_eq!(dma.push(0), Some(Half::Primary));
        assert_eq!(dma.remaining_count(Half::Primary), 0);
        assert_eq!(dma.current(), Half::Alternate);
    }

    #[test]
    fn test_unarmed_half_drops() {
        let mut dma = SimDma::<2>::new();
        dma.arm(Half::Primary);
        dma.push(1);
        dma.push(2);
        assert_eq!(dma.push(3), None);
        assert_eq!(dma.dropped(), 1);
    }

    #[test]
    fn test_push_all_reports_last_completion() {
        let mut dma = SimDma::<2>::new();
        dma.arm(Half::Primary);
        dma.arm(Half::Alternate);
        assert_eq!(dma.push_all(&[1]), None);
        assert_eq!(dma.push_all(&[2, 3, 4]), Some(Half::Alternate));
        assert_eq!(dma.read(Half::Alternate, 1), 4);
        assert_eq!(dma.dropped(), 0);
    }

    #[test]
    fn test_boundary_latch_clears() {
        let mut signal = SimBoundary::default();
        assert!(!signal.pending_and_acknowledge());
        signal.latch();
        assert!(signal.pending_and_acknowledge());
        assert!(!signal.pending_and_acknowledge());
    }
}
