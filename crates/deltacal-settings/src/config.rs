//! Configuration for deltacal
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML files; the default location is
//! `<config dir>/deltacal/config.toml`.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (port, baud rate)
//! - Calibration policy (preheat, reset, tolerance, geometry defaults)
//!
//! Configuration is read once at startup and never changes during a session.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use deltacal_core::PROBE_POINT_COUNT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port the printer is attached to
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        let port = if cfg!(target_os = "windows") {
            "COM8"
        } else {
            "/dev/ttyUSB0"
        };

        Self {
            port: port.to_string(),
            baud_rate: 115200,
        }
    }
}

/// Calibration policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Heat the bed before probing
    pub preheat_bed: bool,
    /// Zero endstop trims and Z offset and restore the default radius first
    pub reset_defaults: bool,
    /// Bed temperature for preheating, in °C
    pub bed_temperature_c: f64,
    /// Largest accepted deviation between towers and center, in mm
    pub tolerance_mm: f64,
    /// Delta radius restored by `reset_defaults`
    pub default_delta_radius: f64,
    /// Clearance added above the highest tower when setting the Z offset, in mm
    pub z_clearance_mm: f64,
    /// Most reply lines read for one autolevel pass
    pub probe_line_limit: usize,
    /// Stop with an error after this many passes (unbounded when unset)
    pub max_passes: Option<u32>,
    /// Fail when no reply arrives within this many ms (waits forever when unset)
    pub response_timeout_ms: Option<u64>,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            preheat_bed: true,
            reset_defaults: true,
            bed_temperature_c: 50.0,
            tolerance_mm: 0.035,
            default_delta_radius: 61.7,
            z_clearance_mm: 0.55,
            probe_line_limit: 13,
            max_passes: None,
            response_timeout_ms: None,
        }
    }
}

impl CalibrationSettings {
    /// Response timeout as a duration
    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_ms.map(Duration::from_millis)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Log every line sent and received
    pub debug: bool,
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Calibration policy
    pub calibration: CalibrationSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location for this platform
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("deltacal").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load the given file, or the default file when `path` is `None`
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let default_path = Self::default_path()?;
        if default_path.exists() {
            Self::load_from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.port.trim().is_empty() {
            return Err(SettingsError::invalid("connection.port", "must not be empty"));
        }

        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }

        let cal = &self.calibration;
        if !is_positive(cal.tolerance_mm) {
            return Err(SettingsError::invalid("calibration.tolerance_mm", "must be > 0"));
        }

        if !is_positive(cal.default_delta_radius) {
            return Err(SettingsError::invalid(
                "calibration.default_delta_radius",
                "must be > 0",
            ));
        }

        if !is_positive(cal.bed_temperature_c) || cal.bed_temperature_c > 150.0 {
            return Err(SettingsError::invalid(
                "calibration.bed_temperature_c",
                "must be within (0, 150]",
            ));
        }

        if !cal.z_clearance_mm.is_finite() {
            return Err(SettingsError::invalid(
                "calibration.z_clearance_mm",
                "must be a finite number",
            ));
        }

        if cal.probe_line_limit < PROBE_POINT_COUNT {
            return Err(SettingsError::invalid(
                "calibration.probe_line_limit",
                format!("must be at least {}", PROBE_POINT_COUNT),
            ));
        }

        if cal.max_passes == Some(0) {
            return Err(SettingsError::invalid("calibration.max_passes", "must be > 0"));
        }

        if cal.response_timeout_ms == Some(0) {
            return Err(SettingsError::invalid(
                "calibration.response_timeout_ms",
                "must be > 0",
            ));
        }

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
