//! Wire constants and transaction encoding
//!
//! Transaction format:
//! - START (1 byte): 0x80, only valid right after a boundary
//! - ROW (1 byte): 1-based row number, 1..=row_limit
//! - DATA (row_bytes bytes): packed pixels, copied verbatim
//! - MARKER (1 byte): 0xFF after every row block
//! - MARKER (1 byte): a second 0xFF where a row number would follow ends
//!   the transaction
//!
//! The encoder here is what a host driving the panel would send; the
//! sniffer itself only decodes.

use heapless::Vec;

use crate::geometry::ScreenGeometry;

/// Transaction start marker
pub const START_MARKER: u8 = 0x80;

/// Row separator and transaction terminator
pub const ROW_MARKER: u8 = 0xFF;

/// Check whether `byte` is an acceptable row number for `row_limit`
pub fn is_valid_row(byte: u8, row_limit: u16) -> bool {
    byte != 0 && byte != ROW_MARKER && (byte as u16) <= row_limit
}

/// Errors that can occur while encoding a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Row number is 0, a marker, or above the row limit
    InvalidRow,
    /// Row data length differs from the geometry's row width
    RowLength,
    /// Output buffer capacity exceeded
    BufferTooSmall,
}

/// Builds one framed transaction into a fixed-capacity buffer
#[derive(Debug, Clone)]
pub struct TransactionBuilder<const N: usize> {
    geometry: ScreenGeometry,
    bytes: Vec<u8, N>,
}

impl<const N: usize> TransactionBuilder<N> {
    /// Start a transaction for `geometry`
    pub fn new(geometry: ScreenGeometry) -> Result<Self, EncodeError> {
        let mut bytes = Vec::new();
        bytes
            .push(START_MARKER)
            .map_err(|_| EncodeError::BufferTooSmall)?;
        Ok(Self { geometry, bytes })
    }

    /// Append one row block
    pub fn row(&mut self, row: u8, data: &[u8]) -> Result<&mut Self, EncodeError> {
        if !is_valid_row(row, self.geometry.row_limit()) {
            return Err(EncodeError::InvalidRow);
        }
        if data.len() != self.geometry.row_bytes() {
            return Err(EncodeError::RowLength);
        }

        self.push(row)?;
        self.bytes
            .extend_from_slice(data)
            .map_err(|_| EncodeError::BufferTooSmall)?;
        self.push(ROW_MARKER)?;
        Ok(self)
    }

    /// Terminate the transaction and return the encoded bytes
    pub fn finish(mut self) -> Result<Vec<u8, N>, EncodeError> {
        self.push(ROW_MARKER)?;
        Ok(self.bytes)
    }

    /// Bytes encoded so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: the start marker is written on creation
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn push(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.bytes
            .push(byte)
            .map_err(|_| EncodeError::BufferTooSmall)
    }
}
