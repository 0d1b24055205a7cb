//! Build script for spisniff-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates sniffer.toml at compile time
//! - Generates `sniffer_config.rs` with the validated values as constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest GPIO number on the RP2040
const MAX_GPIO: i64 = 29;

/// Row numbers must stay below the 0xFF row marker
const MAX_WIDTH: i64 = 0xFE;

/// Largest ring half the DMA transfer count and RAM comfortably allow
const MAX_HALF_CAPACITY: i64 = 64 * 1024;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Values read from sniffer.toml
struct SnifferToml {
    width: i64,
    height: i64,
    half_capacity: i64,
    report_interval_ms: i64,
    mosi: i64,
    sck: i64,
    cs: i64,
}

/// Validate sniffer.toml configuration at compile time
fn validate_config() -> SnifferToml {
    // Re-run if sniffer.toml changes
    println!("cargo:rerun-if-changed=sniffer.toml");

    let config_path = Path::new("sniffer.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: sniffer.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a sniffer.toml configuration file.        ║\n\
            ║  Please create one in the spisniff-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read sniffer.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in sniffer.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let width = require_int(&config, "screen", "width", &mut errors);
    let height = require_int(&config, "screen", "height", &mut errors);
    let half_capacity = require_int(&config, "capture", "half_capacity", &mut errors);
    let report_interval_ms = require_int(&config, "report", "interval_ms", &mut errors);
    let mosi = require_int(&config, "pins", "mosi", &mut errors);
    let sck = require_int(&config, "pins", "sck", &mut errors);
    let cs = require_int(&config, "pins", "cs", &mut errors);

    report_errors("Missing or mistyped fields in sniffer.toml", &errors);

    let parsed = SnifferToml {
        width: width.unwrap_or_default(),
        height: height.unwrap_or_default(),
        half_capacity: half_capacity.unwrap_or_default(),
        report_interval_ms: report_interval_ms.unwrap_or_default(),
        mosi: mosi.unwrap_or_default(),
        sck: sck.unwrap_or_default(),
        cs: cs.unwrap_or_default(),
    };

    validate_screen(&parsed);
    validate_capture(&parsed);
    validate_pins(&parsed);

    println!("cargo:warning=sniffer.toml validated successfully");
    parsed
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list if `errors` is not empty
fn report_errors(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Look up `[section] key` as an integer
fn require_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return None;
        }
        None => {
            errors.push(format!("Missing [{}] section", section));
            return None;
        }
    };

    match table.get(key) {
        Some(toml::Value::Integer(value)) => Some(*value),
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Validate screen geometry
fn validate_screen(config: &SnifferToml) {
    let mut errors = Vec::new();

    if config.width < 1 || config.width > MAX_WIDTH {
        errors.push(format!("[screen] width must be 1-{}", MAX_WIDTH));
    }
    if config.height < 1 || config.height > MAX_WIDTH {
        errors.push(format!("[screen] height must be 1-{}", MAX_WIDTH));
    }

    report_errors("Invalid screen configuration", &errors);

    if config.width != config.height {
        // Rows beyond the height pass the row check and get dropped as errors
        println!(
            "cargo:warning=sniffer.toml: non-square screen ({}x{}), row numbers are checked against the width",
            config.width, config.height
        );
    }
}

/// Validate capture ring and reporting
fn validate_capture(config: &SnifferToml) {
    let mut errors = Vec::new();

    if config.half_capacity < 2 || config.half_capacity > MAX_HALF_CAPACITY {
        errors.push(format!(
            "[capture] half_capacity must be 2-{}",
            MAX_HALF_CAPACITY
        ));
    }
    if config.report_interval_ms < 1 || config.report_interval_ms > u32::MAX as i64 {
        errors.push("[report] interval_ms must be a positive u32".to_string());
    }

    report_errors("Invalid capture configuration", &errors);
}

/// Validate pin assignments
fn validate_pins(config: &SnifferToml) {
    let mut errors = Vec::new();

    for (name, pin) in [("mosi", config.mosi), ("sck", config.sck), ("cs", config.cs)] {
        if pin < 0 || pin > MAX_GPIO {
            errors.push(format!("[pins] {} must be GPIO 0-{}", name, MAX_GPIO));
        }
    }

    if config.sck != config.mosi + 1 {
        errors.push("[pins] sck must be the GPIO right after mosi".to_string());
    }
    if config.cs == config.mosi || config.cs == config.sck {
        errors.push("[pins] cs must not share a GPIO with mosi or sck".to_string());
    }

    report_errors("Invalid pin configuration", &errors);
}

/// Write the validated values out as Rust constants
fn generate_config(config: &SnifferToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let row_bytes = (config.width + 7) / 8;

    let generated = format!(
        "// Generated by build.rs from sniffer.toml\n\
        \n\
        /// Pixels per row\n\
        pub const SCREEN_WIDTH: u16 = {width};\n\
        /// Rows in the image\n\
        pub const SCREEN_HEIGHT: u16 = {height};\n\
        /// Packed bytes per row\n\
        pub const ROW_BYTES: usize = {row_bytes};\n\
        /// Framebuffer rows\n\
        pub const ROWS: usize = {height};\n\
        /// Bytes per capture ring half\n\
        pub const HALF_CAPACITY: usize = {half};\n\
        /// Interval between diagnostic reports\n\
        pub const REPORT_INTERVAL_MS: u32 = {interval};\n\
        /// Chip-select GPIO\n\
        pub const CS_PIN: u8 = {cs};\n\
        \n\
        /// Take the MOSI, SCK and CS pins from the peripherals\n\
        macro_rules! take_capture_pins {{\n\
        \x20   ($p:expr) => {{\n\
        \x20       ($p.PIN_{mosi}, $p.PIN_{sck}, $p.PIN_{cs})\n\
        \x20   }};\n\
        }}\n",
        width = config.width,
        height = config.height,
        row_bytes = row_bytes,
        half = config.half_capacity,
        interval = config.report_interval_ms,
        mosi = config.mosi,
        sck = config.sck,
        cs = config.cs,
    );

    fs::write(out_dir.join("sniffer_config.rs"), generated).unwrap();
}
