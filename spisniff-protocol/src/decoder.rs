//! Byte-at-a-time transaction decoder
//!
//! Interprets the captured byte stream and writes row data into a
//! [`Framebuffer`]. A malformed stream parks the decoder in
//! [`DecoderState::Error`] and every later byte is ignored until
//! [`Decoder::end_transaction`] runs at the next bus boundary.

use crate::framebuffer::Framebuffer;
use crate::state::DecoderState;
use crate::wire::{is_valid_row, ROW_MARKER, START_MARKER};

/// Protocol state machine
#[derive(Debug, Clone)]
pub struct Decoder {
    state: DecoderState,
    last_error: Option<DecoderState>,
    row_limit: u16,
    /// Row being filled (1-based), valid in ReceivingData
    row: u16,
    /// Bytes written into the current row
    column: usize,
}

impl Decoder {
    /// Create a decoder accepting row numbers `1..=row_limit`
    pub const fn new(row_limit: u16) -> Self {
        Self {
            state: DecoderState::Idle,
            last_error: None,
            row_limit,
            row: 0,
            column: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// State in which the most recent error was detected
    pub fn last_error(&self) -> Option<DecoderState> {
        self.last_error
    }

    /// Highest accepted row number
    pub fn row_limit(&self) -> u16 {
        self.row_limit
    }

    /// Bytes written into the current row so far
    pub fn column_count(&self) -> usize {
        self.column
    }

    /// Flat framebuffer offset of the next data byte
    ///
    /// Only meaningful while receiving row data.
    pub fn output_cursor<const ROW_BYTES: usize>(&self) -> Option<usize> {
        if self.state != DecoderState::ReceivingData {
            return None;
        }
        Some((self.row as usize - 1) * ROW_BYTES + self.column)
    }

    /// Feed one captured byte
    pub fn feed<const ROW_BYTES: usize, const ROWS: usize>(
        &mut self,
        byte: u8,
        framebuffer: &mut Framebuffer<ROW_BYTES, ROWS>,
    ) {
        match self.state {
            DecoderState::Idle => {
                if byte == START_MARKER {
                    self.state = DecoderState::AwaitingRow;
                } else {
                    self.fail();
                }
            }
            DecoderState::AwaitingRow => {
                if byte == ROW_MARKER {
                    self.state = DecoderState::Done;
                } else if is_valid_row(byte, self.row_limit) {
                    self.row = byte as u16;
                    self.column = 0;
                    self.state = DecoderState::ReceivingData;
                } else {
                    self.fail();
                }
            }
            DecoderState::ReceivingData => {
                if framebuffer.write(self.row, self.column, byte).is_err() {
                    // Row passed the width-based check but the buffer is shorter
                    self.fail();
                    return;
                }
                self.column += 1;
                if self.column >= ROW_BYTES {
                    self.state = DecoderState::AwaitingNextRowOrEnd;
                }
            }
            DecoderState::AwaitingNextRowOrEnd => {
                if byte == ROW_MARKER {
                    self.state = DecoderState::AwaitingRow;
                } else {
                    self.fail();
                }
            }
            // Frozen until the next boundary
            DecoderState::Done | DecoderState::Error => {}
        }
    }

    /// Feed a run of bytes in order
    pub fn feed_bytes<const ROW_BYTES: usize, const ROWS: usize>(
        &mut self,
        bytes: &[u8],
        framebuffer: &mut Framebuffer<ROW_BYTES, ROWS>,
    ) {
        for &byte in bytes {
            self.feed(byte, framebuffer);
        }
    }

    /// Close the current transaction at a bus boundary
    ///
    /// Returns the state the transaction ended in if it did not terminate
    /// cleanly, and records it as `last_error`. A transaction that already
    /// failed is recorded as `Error`. The decoder is back in `Idle`
    /// afterwards either way.
    pub fn end_transaction(&mut self) -> Option<DecoderState> {
        let ended_in = self.state;

        self.state = DecoderState::Idle;
        self.row = 0;
        self.column = 0;

        match ended_in {
            DecoderState::Done => None,
            _ => {
                self.last_error = Some(ended_in);
                Some(ended_in)
            }
        }
    }

    fn fail(&mut self) {
        self.last_error = Some(self.state);
        self.state = DecoderState::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Fb = Framebuffer<16, 128>;

    fn decoder() -> Decoder {
        Decoder::new(128)
    }

    #[test]
    fn test_single_row_transaction() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        let data: [u8; 16] = core::array::from_fn(|i| i as u8 * 3);

        dec.feed_bytes(&[0x80, 5], &mut fb);
        assert_eq!(dec.state(), DecoderState::ReceivingData);
        assert_eq!(dec.output_cursor::<16>(), Some(4 * 16));

        dec.feed_bytes(&data, &mut fb);
        assert_eq!(dec.state(), DecoderState::AwaitingNextRowOrEnd);
        assert_eq!(dec.column_count(), 16);

        dec.feed(0xFF, &mut fb);
        assert_eq!(dec.state(), DecoderState::AwaitingRow);
        dec.feed(0xFF, &mut fb);
        assert_eq!(dec.state(), DecoderState::Done);

        assert_eq!(fb.row(5), Some(&data));
        assert_eq!(dec.last_error(), None);
    }

    #[test]
    fn test_zero_row_transaction() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 0xFF], &mut fb);
        assert_eq!(dec.state(), DecoderState::Done);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_row_zero_is_error() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 0x00], &mut fb);
        assert_eq!(dec.state(), DecoderState::Error);
        assert_eq!(dec.last_error(), Some(DecoderState::AwaitingRow));
    }

    #[test]
    fn test_row_above_limit_is_error() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 129], &mut fb);
        assert_eq!(dec.state(), DecoderState::Error);
        assert_eq!(dec.last_error(), Some(DecoderState::AwaitingRow));
    }

    #[test]
    fn test_wrong_start_byte() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed(0x7F, &mut fb);
        assert_eq!(dec.state(), DecoderState::Error);
        assert_eq!(dec.last_error(), Some(DecoderState::Idle));
    }

    #[test]
    fn test_missing_row_marker() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 1], &mut fb);
        dec.feed_bytes(&[0u8; 16], &mut fb);
        dec.feed(0x12, &mut fb);
        assert_eq!(dec.state(), DecoderState::Error);
        assert_eq!(dec.last_error(), Some(DecoderState::AwaitingNextRowOrEnd));
    }

    #[test]
    fn test_error_freezes_decoding() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        // Garbage first, then a perfectly valid transaction
        dec.feed(0x01, &mut fb);
        dec.feed_bytes(&[0x80, 1], &mut fb);
        dec.feed_bytes(&[0xAA; 16], &mut fb);
        dec.feed_bytes(&[0xFF, 0xFF], &mut fb);

        assert_eq!(dec.state(), DecoderState::Error);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_done_ignores_trailing_bytes() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 0xFF, 0x80, 1, 0xAA], &mut fb);
        assert_eq!(dec.state(), DecoderState::Done);
        assert!(fb.row(1).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_end_transaction_clean() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 0xFF], &mut fb);
        assert_eq!(dec.end_transaction(), None);
        assert_eq!(dec.state(), DecoderState::Idle);
    }

    #[test]
    fn test_end_transaction_incomplete_records_state() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed_bytes(&[0x80, 7, 1, 2], &mut fb);
        assert_eq!(dec.end_transaction(), Some(DecoderState::ReceivingData));
        assert_eq!(dec.last_error(), Some(DecoderState::ReceivingData));
        assert_eq!(dec.state(), DecoderState::Idle);
    }

    #[test]
    fn test_end_transaction_in_error_records_error() {
        let mut fb = Fb::new();
        let mut dec = decoder();
        dec.feed(0x00, &mut fb);
        assert_eq!(dec.last_error(), Some(DecoderState::Idle));
        assert_eq!(dec.end_transaction(), Some(DecoderState::Error));
        assert_eq!(dec.last_error(), Some(DecoderState::Error));
        assert_eq!(dec.state(), DecoderState::Idle);
    }

    #[test]
    fn test_end_transaction_from_idle_counts() {
        let mut dec = decoder();
        assert_eq!(dec.end_transaction(), Some(DecoderState::Idle));
        assert_eq!(dec.last_error(), Some(DecoderState::Idle));
    }

    #[test]
    fn test_short_framebuffer_is_guarded() {
        // Width-based bound accepts row 8, but only 4 rows exist
        let mut fb = Framebuffer::<1, 4>::new();
        let mut dec = Decoder::new(8);
        dec.feed_bytes(&[0x80, 8, 0x55], &mut fb);
        assert_eq!(dec.state(), DecoderState::Error);
        assert_eq!(dec.last_error(), Some(DecoderState::ReceivingData));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    proptest! {
        #[test]
        fn prop_any_valid_row_decodes(row in 1u8..=128, data in prop::array::uniform16(any::<u8>())) {
            let mut fb = Fb::new();
            let mut dec = decoder();
            dec.feed_bytes(&[0x80, row], &mut fb);
            dec.feed_bytes(&data, &mut fb);
            dec.feed_bytes(&[0xFF, 0xFF], &mut fb);

            prop_assert_eq!(dec.state(), DecoderState::Done);
            prop_assert_eq!(fb.row(row as u16), Some(&data));
            prop_assert_eq!(dec.last_error(), None);
        }

        #[test]
        fn prop_full_image_roundtrip(seed in any::<u64>()) {
            let mut fb = Fb::new();
            let mut dec = decoder();
            let pixel = |row: usize, col: usize| (seed.rotate_left((row * 7 + col) as u32) as u8) ^ (row as u8);

            dec.feed(0x80, &mut fb);
            for row in 1..=128usize {
                dec.feed(row as u8, &mut fb);
                for col in 0..16 {
                    dec.feed(pixel(row, col), &mut fb);
                }
                dec.feed(0xFF, &mut fb);
            }
            dec.feed(0xFF, &mut fb);

            prop_assert_eq!(dec.state(), DecoderState::Done);
            for row in 1..=128usize {
                let expected: [u8; 16] = core::array::from_fn(|col| pixel(row, col));
                prop_assert_eq!(fb.row(row as u16), Some(&expected));
            }
        }
    }
}
