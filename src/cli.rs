//! Command-line interface

use clap::Parser;
use deltacal_settings::Config;
use std::path::PathBuf;

/// Command-line arguments for deltacal
#[derive(Parser, Debug, Default)]
#[command(name = "deltacal")]
#[command(about = "Automatic endstop and delta-radius calibration for Marlin delta printers")]
#[command(version)]
pub struct Args {
    /// Config file (TOML or JSON); defaults to <config dir>/deltacal/config.toml
    #[arg(short, long, env = "DELTACAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serial port the printer is attached to
    #[arg(short, long, env = "DELTACAL_PORT")]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Log every line sent and received
    #[arg(short, long)]
    pub debug: bool,

    /// Do not heat the bed before probing
    #[arg(long)]
    pub no_preheat: bool,

    /// Keep the current endstops, radius and Z offset instead of resetting them
    #[arg(long)]
    pub no_reset: bool,

    /// Bed temperature for preheating, in °C
    #[arg(long)]
    pub bed_temp: Option<f64>,

    /// Largest accepted deviation, in mm
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Give up after this many passes
    #[arg(long)]
    pub max_passes: Option<u32>,

    /// Fail when the printer is silent for this many ms
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// List serial ports and exit
    #[arg(long)]
    pub list_ports: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = &self.port {
            config.connection.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.connection.baud_rate = baud;
        }
        config.debug |= self.debug;

        let cal = &mut config.calibration;
        if self.no_preheat {
            cal.preheat_bed = false;
        }
        if self.no_reset {
            cal.reset_defaults = false;
        }
        if let Some(temp) = self.bed_temp {
            cal.bed_temperature_c = temp;
        }
        if let Some(tolerance) = self.tolerance {
            cal.tolerance_mm = tolerance;
        }
        if self.max_passes.is_some() {
            cal.max_passes = self.max_passes;
        }
        if self.timeout_ms.is_some() {
            cal.response_timeout_ms = self.timeout_ms;
        }
    }
}
