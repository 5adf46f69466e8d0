//! deltacal Settings Crate
//!
//! Handles the static configuration of a calibration session: transport
//! endpoint, calibration policy and logging.

pub mod config;
pub mod error;

pub use config::{CalibrationSettings, Config, ConnectionSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
