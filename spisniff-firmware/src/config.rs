//! Build-time configuration
//!
//! Values come from `sniffer.toml`, validated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/sniffer_config.rs"));

use spisniff_core::{ScreenGeometry, SnifferConfig};

/// Runtime view of the build-time configuration
pub const fn sniffer_config() -> SnifferConfig {
    SnifferConfig {
        geometry: ScreenGeometry::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        report_interval_ms: REPORT_INTERVAL_MS,
    }
}
