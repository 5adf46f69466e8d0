//! # deltacal
//!
//! Automatic endstop and delta-radius calibration for Marlin delta printers.
//!
//! ## Architecture
//!
//! deltacal is organized as a workspace with multiple crates:
//!
//! 1. **deltacal-core** - Device events, calibration data model, errors
//! 2. **deltacal-communication** - Serial device link, Marlin commands and reply classification
//! 3. **deltacal-settings** - Configuration file handling and validation
//! 4. **deltacal-calibration** - Gate, event sink, probing, statistics, planner, controller
//! 5. **deltacal** - Main binary that integrates all crates
//!
//! A session homes the printer, probes the bed, and corrects either the
//! endstop trims or the delta radius until every tower and the bed center
//! are within tolerance of the highest tower. The Z offset is then set just
//! below the highest tower and saved to EEPROM.

pub mod cli;

pub use deltacal_calibration::{
    Adjustment, CalibrationController, CalibrationReport, EventSink, Gate, Printer,
};
pub use deltacal_communication::{
    list_ports, ConnectionParams, DeviceLink, MarlinCommand, SerialDeviceLink, SerialPortInfo,
};
pub use deltacal_core::{CalibrationError, DeviceEvent, DeviceListener, Error, Result};
pub use deltacal_settings::{CalibrationSettings, Config, ConnectionSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support (overrides `debug`)
/// - `debug` raising the default level so every line sent and received is shown
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_level(true)
        .with_thread_names(debug)
        .with_line_number(debug);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
