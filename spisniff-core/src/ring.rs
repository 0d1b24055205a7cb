//! Ping-pong capture ring
//!
//! The transfer engine writes the two halves in turn; the ring only keeps
//! the software cursors over their concatenation:
//!
//! ```text
//!   0                 H                 2H
//!   ├──── Primary ────┼─── Alternate ───┤
//!        ▲ tail            ▲ engine
//! ```
//!
//! `tail` is the next byte to decode. Both interrupt handlers drain from
//! `tail` forward, so decode order equals capture order no matter which
//! handler does the draining.

use spisniff_hal::{Half, TransferEngine};

/// Bytes captured into a half, from its remaining-count register
///
/// A non-zero register means `(half_capacity - 1) - remaining` bytes have
/// arrived. Zero means the half is full. With one transfer left the
/// register also reads zero, so that moment is reported as a full half.
/// A zero-sized half never holds anything.
pub fn captured_from_remaining(remaining: u32, half_capacity: usize) -> usize {
    if remaining != 0 {
        half_capacity.saturating_sub(1).saturating_sub(remaining as usize)
    } else {
        half_capacity
    }
}

/// Software cursors over a two-half capture engine
#[derive(Debug)]
pub struct CaptureRing<E> {
    engine: E,
    /// Next undecoded absolute offset, `0..CAPACITY`
    tail: usize,
    /// Last position handed to the decoder
    head: usize,
    /// Half the engine is filling, as far as software knows
    active: Half,
}

impl<E: TransferEngine> CaptureRing<E> {
    /// Bytes per half
    pub const HALF_CAPACITY: usize = E::HALF_CAPACITY;

    /// Bytes in the whole ring
    pub const CAPACITY: usize = 2 * E::HALF_CAPACITY;

    /// Wrap an engine; nothing is armed until [`CaptureRing::start`]
    ///
    /// Engines with a zero-sized half are rejected at compile time.
    pub fn new(engine: E) -> Self {
        const {
            assert!(
                E::HALF_CAPACITY > 0,
                "capture ring halves must hold at least one byte"
            )
        };
        Self {
            engine,
            tail: 0,
            head: 0,
            active: Half::Primary,
        }
    }

    /// Arm both halves and rewind the cursors
    pub fn start(&mut self) {
        self.tail = 0;
        self.head = 0;
        self.active = Half::Primary;
        self.engine.arm(Half::Primary);
        self.engine.arm(Half::Alternate);
    }

    /// Next undecoded offset
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Last drain target
    pub fn head(&self) -> usize {
        self.head
    }

    /// Half the engine is currently filling
    pub fn active_half(&self) -> Half {
        self.active
    }

    /// Shared access to the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the engine
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Bytes already written into the active half
    pub fn captured_in_active(&self) -> usize {
        captured_from_remaining(self.engine.remaining_count(self.active), E::HALF_CAPACITY)
    }

    /// Absolute ring position one past the newest captured byte
    pub fn boundary_position(&self) -> usize {
        (self.active.index() * E::HALF_CAPACITY + self.captured_in_active()) % Self::CAPACITY
    }

    /// Hand every byte from `tail` up to `position` to `sink`, in order
    ///
    /// Returns the number of bytes drained. `position` is taken modulo the
    /// ring capacity; draining to the current tail is a no-op.
    pub fn drain_to(&mut self, position: usize, mut sink: impl FnMut(u8)) -> usize {
        let position = position % Self::CAPACITY;
        let mut drained = 0;

        while self.tail != position {
            let half = Half::containing(self.tail, E::HALF_CAPACITY);
            sink(self.engine.read(half, self.tail % E::HALF_CAPACITY));
            self.tail = (self.tail + 1) % Self::CAPACITY;
            drained += 1;
        }

        self.head = position;
        drained
    }

    /// Service a completed half
    ///
    /// Re-arms the half first so capture continues into it on the next
    /// lap, then drains whatever of it is still undecoded and moves on to
    /// the other half.
    pub fn complete_half(&mut self, half: Half, sink: impl FnMut(u8)) -> usize {
        self.engine.arm(half);
        let end = (half.index() + 1) * E::HALF_CAPACITY;
        let drained = self.drain_to(end, sink);
        self.active = half.other();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDma;

    #[test]
    fn test_tie_break_nonzero() {
        assert_eq!(captured_from_remaining(15, 16), 0);
        assert_eq!(captured_from_remaining(14, 16), 1);
        assert_eq!(captured_from_remaining(1, 16), 14);
    }

    #[test]
    fn test_tie_break_zero_is_full_half() {
        assert_eq!(captured_from_remaining(0, 16), 16);
        assert_eq!(captured_from_remaining(0, 1024), 1024);
    }

    #[test]
    fn test_zero_sized_half_captures_nothing() {
        assert_eq!(captured_from_remaining(0, 0), 0);
        assert_eq!(captured_from_remaining(5, 0), 0);
        assert_eq!(captured_from_remaining(5, 1), 0);
    }

    #[test]
    fn test_start_arms_both_halves() {
        let mut ring = CaptureRing::new(SimDma::<8>::new());
        assert!(!ring.engine().is_armed(Half::Primary));
        ring.start();
        assert!(ring.engine().is_armed(Half::Primary));
        assert!(ring.engine().is_armed(Half::Alternate));
        assert_eq!(ring.captured_in_active(), 0);
    }

    #[test]
    fn test_drain_partial_half() {
        let mut ring = CaptureRing::new(SimDma::<8>::new());
        ring.start();
        for b in 1..=3 {
            ring.engine_mut().push(b);
        }

        assert_eq!(ring.boundary_position(), 3);
        let mut seen = heapless::Vec::<u8, 8>::new();
        let n = ring.drain_to(ring.boundary_position(), |b| seen.push(b).unwrap());
        assert_eq!(n, 3);
        assert_eq!(seen.as_slice(), &[1, 2, 3]);
        assert_eq!(ring.tail(), 3);
        assert_eq!(ring.head(), 3);

        // Nothing new arrived
        assert_eq!(ring.drain_to(ring.boundary_position(), |_| {}), 0);
    }

    #[test]
    fn test_complete_half_drains_only_remainder() {
        let mut ring = CaptureRing::new(SimDma::<4>::new());
        ring.start();
        ring.engine_mut().push(10);
        ring.engine_mut().push(11);
        ring.drain_to(ring.boundary_position(), |_| {});

        ring.engine_mut().push(12);
        let done = ring.engine_mut().push(13);
        assert_eq!(done, Some(Half::Primary));

        let mut seen = heapless::Vec::<u8, 4>::new();
        let n = ring.complete_half(Half::Primary, |b| seen.push(b).unwrap());
        assert_eq!(n, 2);
        assert_eq!(seen.as_slice(), &[12, 13]);
        assert_eq!(ring.tail(), 4);
        assert_eq!(ring.active_half(), Half::Alternate);
        assert!(ring.engine().is_armed(Half::Primary));
    }

    #[test]
    fn test_tail_wraps_to_zero() {
        let mut ring = CaptureRing::new(SimDma::<2>::new());
        ring.start();
        let mut seen = heapless::Vec::<u8, 8>::new();

        for b in 0..6u8 {
            if let Some(half) = ring.engine_mut().push(b) {
                ring.complete_half(half, |x| seen.push(x).unwrap());
            }
        }

        assert_eq!(seen.as_slice(), &[0, 1, 2, 3, 4, 5]);
        // Three halves of two bytes: back in the alternate half at offset 2
        assert_eq!(ring.tail(), 2);
        assert_eq!(ring.active_half(), Half::Alternate);
    }

    #[test]
    fn test_full_but_unserviced_half_reads_complete() {
        let mut ring = CaptureRing::new(SimDma::<4>::new());
        ring.start();
        for b in 0..4 {
            ring.engine_mut().push(b);
        }
        // Half-complete not yet serviced: the register of the old half is 0
        assert_eq!(ring.active_half(), Half::Primary);
        assert_eq!(ring.captured_in_active(), 4);
        assert_eq!(ring.boundary_position(), 4);
    }
}
