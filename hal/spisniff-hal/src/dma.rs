//! Ping-pong transfer engine abstraction
//!
//! The capture memory is split into two equal halves. The engine fills one
//! half while software drains the other; when a half completes the engine
//! continues in the other half without CPU help, provided that half has
//! been re-armed.

/// One of the two physical halves of the capture memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// First half (primary descriptor)
    Primary,
    /// Second half (alternate descriptor)
    Alternate,
}

impl Half {
    /// Index of this half (0 or 1)
    pub const fn index(self) -> usize {
        match self {
            Half::Primary => 0,
            Half::Alternate => 1,
        }
    }

    /// The half the engine moves to after this one
    pub const fn other(self) -> Self {
        match self {
            Half::Primary => Half::Alternate,
            Half::Alternate => Half::Primary,
        }
    }

    /// Half that owns an absolute ring offset
    pub const fn containing(offset: usize, half_capacity: usize) -> Self {
        if (offset % (2 * half_capacity)) < half_capacity {
            Half::Primary
        } else {
            Half::Alternate
        }
    }
}

/// Hardware transfer engine feeding a two-half capture ring
///
/// Implementations are bound to their source register and destination
/// memory at construction; `arm` only re-issues the fixed descriptor for
/// one half.
pub trait TransferEngine {
    /// Capacity of one half in bytes, never zero
    const HALF_CAPACITY: usize;

    /// Re-arm the descriptor of `half` for another full capture cycle
    ///
    /// Must not disturb a transfer in progress on the other half.
    fn arm(&mut self, half: Half);

    /// Read the decrementing terminal-count register of `half`
    ///
    /// Uses the n-minus-1 convention: `HALF_CAPACITY - 1` right after the
    /// half started, counting down by one per byte, and `0` once the half
    /// has completed.
    fn remaining_count(&self, half: Half) -> u32;

    /// Read one captured byte from `half` at `offset`
    ///
    /// `offset` is always below `HALF_CAPACITY`.
    fn read(&self, half: Half, offset: usize) -> u8;
}
