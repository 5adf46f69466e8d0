//! Marlin Command Creator
//!
//! Builds the G-code lines the calibration routine sends to a Marlin delta
//! printer. Numeric arguments are written with four decimals.

use deltacal_core::EndstopTrim;
use std::fmt;

/// Autolevel parameters: two probe points per tower, verbosity 4 (prints each point)
const AUTOLEVEL_ARGS: &str = "P2 V4";

/// Commands issued during calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarlinCommand {
    /// Home all towers (G28)
    Home,
    /// Run the bed autolevel probe (G29)
    ProbeAutolevel,
    /// Set bed temperature and wait until reached (M190)
    HeatBedAndWait {
        /// Target temperature in °C
        celsius: f64,
    },
    /// Dump current settings (M503)
    DumpSettings,
    /// Save settings to EEPROM (M500)
    SaveSettings,
    /// Set endstop trims (M666)
    SetEndstopTrim(EndstopTrim),
    /// Set delta radius (M665 R)
    SetDeltaRadius(f64),
    /// Set the Z home offset that moves the software Z endstop (M206 Z)
    SetZOffset(f64),
    /// Request a temperature report (M105); used to detect the device coming online
    ReportTemperature,
}

impl MarlinCommand {
    /// The bare G/M code of this command
    pub fn code(&self) -> &'static str {
        match self {
            Self::Home => "G28",
            Self::ProbeAutolevel => "G29",
            Self::HeatBedAndWait { .. } => "M190",
            Self::DumpSettings => "M503",
            Self::SaveSettings => "M500",
            Self::SetEndstopTrim(_) => "M666",
            Self::SetDeltaRadius(_) => "M665",
            Self::SetZOffset(_) => "M206",
            Self::ReportTemperature => "M105",
        }
    }
}

impl fmt::Display for MarlinCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeAutolevel => write!(f, "{} {}", self.code(), AUTOLEVEL_ARGS),
            Self::HeatBedAndWait { celsius } => write!(f, "{} S{:.4}", self.code(), celsius),
            Self::SetEndstopTrim(trim) => write!(
                f,
                "{} X{:.4} Y{:.4} Z{:.4}",
                self.code(),
                trim.x,
                trim.y,
                trim.z
            ),
            Self::SetDeltaRadius(radius) => write!(f, "{} R{:.4}", self.code(), radius),
            Self::SetZOffset(z) => write!(f, "{} Z{:.4}", self.code(), z),
            Self::Home
            | Self::DumpSettings
            | Self::SaveSettings
            | Self::ReportTemperature => write!(f, "{}", self.code()),
        }
    }
}
