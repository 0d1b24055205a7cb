//! Sniffer configuration
//!
//! Sizes that decide memory layout (ring half capacity, framebuffer
//! dimensions) are const generics; this struct carries the runtime view of
//! the same numbers so they can be cross-checked at start-up.

use spisniff_protocol::ScreenGeometry;

/// Highest row number that can be told apart from the row marker
pub const MAX_ROW_NUMBER: u16 = 0xFE;

/// Default interval between diagnostic reports
pub const DEFAULT_REPORT_INTERVAL_MS: u32 = 1000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Screen width is zero
    EmptyRow,
    /// Geometry does not match the framebuffer's dimensions
    GeometryMismatch,
    /// Row numbers would collide with the row marker
    RowLimitTooLarge,
    /// Capture ring halves have no capacity
    EmptyRing,
    /// Report interval is zero
    ZeroReportInterval,
}

/// Runtime configuration of a sniffer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnifferConfig {
    /// Geometry of the observed panel
    pub geometry: ScreenGeometry,
    /// Interval between diagnostic reports
    pub report_interval_ms: u32,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            geometry: ScreenGeometry::default(),
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
        }
    }
}

impl SnifferConfig {
    /// Create a config for `geometry` with the default report interval
    pub const fn new(geometry: ScreenGeometry) -> Self {
        Self {
            geometry,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
        }
    }

    /// Check the config against a framebuffer of `ROW_BYTES` x `ROWS`
    pub fn validate<const ROW_BYTES: usize, const ROWS: usize>(&self) -> Result<(), ConfigError> {
        if self.geometry.width == 0 {
            return Err(ConfigError::EmptyRow);
        }
        if self.geometry.row_bytes() != ROW_BYTES || self.geometry.height as usize != ROWS {
            return Err(ConfigError::GeometryMismatch);
        }
        if self.geometry.row_limit() > MAX_ROW_NUMBER {
            return Err(ConfigError::RowLimitTooLarge);
        }
        if self.report_interval_ms == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }
}
