//! Decoded screen bitmap
//!
//! Flat row-major storage, one packed row of `ROW_BYTES` per panel line.
//! Row numbers on this API are the 1-based numbers used on the wire.

/// Errors from bounded framebuffer access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramebufferError {
    /// Row number is 0 or beyond the last row
    RowOutOfRange,
    /// Column offset is at or beyond the row width
    ColumnOutOfRange,
}

/// Packed 1-bit bitmap of `ROWS` rows by `ROW_BYTES` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const ROW_BYTES: usize, const ROWS: usize> {
    rows: [[u8; ROW_BYTES]; ROWS],
}

/// Framebuffer of the 128x128 reference panel
pub type ReferenceFramebuffer = Framebuffer<16, 128>;

impl<const ROW_BYTES: usize, const ROWS: usize> Default for Framebuffer<ROW_BYTES, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW_BYTES: usize, const ROWS: usize> Framebuffer<ROW_BYTES, ROWS> {
    /// Bytes per row
    pub const ROW_BYTES: usize = ROW_BYTES;

    /// Number of rows
    pub const ROWS: usize = ROWS;

    /// Create a cleared framebuffer
    pub const fn new() -> Self {
        Self {
            rows: [[0; ROW_BYTES]; ROWS],
        }
    }

    /// Flat byte offset of `(row, column)`: `(row - 1) * ROW_BYTES + column`
    pub fn offset(row: u16, column: usize) -> Result<usize, FramebufferError> {
        if row == 0 || row as usize > ROWS {
            return Err(FramebufferError::RowOutOfRange);
        }
        if column >= ROW_BYTES {
            return Err(FramebufferError::ColumnOutOfRange);
        }
        Ok((row as usize - 1) * ROW_BYTES + column)
    }

    /// Store one byte of row `row` at `column`
    pub fn write(&mut self, row: u16, column: usize, byte: u8) -> Result<(), FramebufferError> {
        Self::offset(row, column)?;
        self.rows[row as usize - 1][column] = byte;
        Ok(())
    }

    /// Read-only view of one row
    pub fn row(&self, row: u16) -> Option<&[u8; ROW_BYTES]> {
        if row == 0 {
            return None;
        }
        self.rows.get(row as usize - 1)
    }

    /// Iterate over all rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8; ROW_BYTES]> {
        self.rows.iter()
    }

    /// The whole bitmap as flat row-major bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.rows.as_flattened()
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_formula() {
        assert_eq!(Framebuffer::<16, 128>::offset(1, 0), Ok(0));
        assert_eq!(Framebuffer::<16, 128>::offset(2, 3), Ok(19));
        assert_eq!(Framebuffer::<16, 128>::offset(128, 15), Ok(2047));
    }

    #[test]
    fn test_offset_rejects_out_of_range() {
        assert_eq!(
            Framebuffer::<16, 128>::offset(0, 0),
            Err(FramebufferError::RowOutOfRange)
        );
        assert_eq!(
            Framebuffer::<16, 128>::offset(129, 0),
            Err(FramebufferError::RowOutOfRange)
        );
        assert_eq!(
            Framebuffer::<16, 128>::offset(1, 16),
            Err(FramebufferError::ColumnOutOfRange)
        );
    }

    #[test]
    fn test_write_lands_in_flat_layout() {
        let mut fb = Framebuffer::<2, 3>::new();
        fb.write(2, 1, 0xAB).unwrap();
        assert_eq!(fb.as_bytes(), &[0, 0, 0, 0xAB, 0, 0]);
        assert_eq!(fb.row(2), Some(&[0, 0xAB]));
    }

    #[test]
    fn test_failed_write_leaves_buffer_untouched() {
        let mut fb = Framebuffer::<2, 3>::new();
        assert!(fb.write(4, 0, 0xFF).is_err());
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_row_accessor_bounds() {
        let fb = Framebuffer::<2, 3>::new();
        assert!(fb.row(0).is_none());
        assert!(fb.row(3).is_some());
        assert!(fb.row(4).is_none());
        assert_eq!(fb.rows().count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::<2, 2>::new();
        fb.write(1, 0, 1).unwrap();
        fb.write(2, 1, 2).unwrap();
        fb.clear();
        assert_eq!(fb, Framebuffer::new());
    }
}
