//! Chip-select edge latch
//!
//! IO_BANK0 latches GPIO edges in its raw interrupt register whether or not
//! the interrupt is enabled. The boundary signal reads and clears the
//! falling-edge bit of the chip-select pin.

use embassy_rp::pac;
use spisniff_hal::BoundarySignal;

/// Falling edge on the chip-select GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipSelectEdge {
    pin: u8,
}

impl ChipSelectEdge {
    /// Latch for GPIO `pin`
    pub const fn new(pin: u8) -> Self {
        Self { pin }
    }

    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    fn group(&self) -> (usize, usize) {
        // Eight pins per INTR register, four event bits each
        (self.pin as usize / 8, self.pin as usize % 8)
    }
}

impl BoundarySignal for ChipSelectEdge {
    fn pending_and_acknowledge(&mut self) -> bool {
        let (register, slot) = self.group();
        let intr = pac::IO_BANK0.intr(register);

        if !intr.read().edge_low(slot) {
            return false;
        }

        intr.write(|w| w.set_edge_low(slot, true));
        true
    }
}
