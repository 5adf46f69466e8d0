//! Marlin Response Parser
//!
//! Classifies Marlin output lines into the reports the calibration routine
//! consumes. Lines that match none of them are `Unrecognized`; the stream is
//! noisy (echo lines, busy notices, temperature reports) and such lines are
//! never an error.
//!
//! Patterns are searched anywhere in the line, so `echo:  M666 X0.00 ...`
//! is recognized the same as a bare `M666 X0.00 ...`.

use deltacal_core::{DeltaGeometry, DeviceEvent, EndstopTrim, FirmwareError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// `ADVANCED_OK` acknowledgement that ends every command's output
pub const COMMAND_COMPLETE_PATTERN: &str = "ok N0 P15 B15";
/// Per-point report printed by `G29 V4`
pub const PROBE_POINT_PATTERN: &str = "Bed X: (.*) Y: (.*) Z: (.*)";
/// Endstop trim line of the `M503` dump
pub const ENDSTOP_TRIM_PATTERN: &str = "M666 X(.*) Y(.*) Z(.*)";
/// Delta geometry line of the `M503` dump
pub const DELTA_GEOMETRY_PATTERN: &str = "M665 L(.*) R(.*) S(.*)";

/// Classified Marlin output line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarlinResponse {
    /// Completion marker
    CommandComplete,
    /// One autolevel probe point; only the measured Z is kept
    ProbePoint {
        /// Measured bed height
        z: f64,
    },
    /// Endstop trim report
    EndstopTrim(EndstopTrim),
    /// Delta geometry report
    DeltaGeometry(DeltaGeometry),
    /// Anything else
    Unrecognized(String),
}

struct Patterns {
    complete: Regex,
    probe_point: Regex,
    endstop_trim: Regex,
    delta_geometry: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        complete: Regex::new(COMMAND_COMPLETE_PATTERN).expect("invalid completion pattern"),
        probe_point: Regex::new(PROBE_POINT_PATTERN).expect("invalid probe pattern"),
        endstop_trim: Regex::new(ENDSTOP_TRIM_PATTERN).expect("invalid M666 pattern"),
        delta_geometry: Regex::new(DELTA_GEOMETRY_PATTERN).expect("invalid M665 pattern"),
    })
}

/// Marlin response parser
#[derive(Debug, Clone, Copy, Default)]
pub struct MarlinResponseParser;

impl MarlinResponseParser {
    /// Create a new Marlin response parser
    pub fn new() -> Self {
        Self
    }

    /// Classify one line
    ///
    /// The completion marker is checked first, then the probe point, endstop
    /// trim and geometry reports. A line that matches a report but carries a
    /// non-numeric field is a [`FirmwareError`].
    pub fn parse(&self, line: &str) -> Result<MarlinResponse, FirmwareError> {
        let line = line.trim();
        let patterns = patterns();

        if patterns.complete.is_match(line) {
            return Ok(MarlinResponse::CommandComplete);
        }

        if let Some(caps) = patterns.probe_point.captures(line) {
            return Ok(MarlinResponse::ProbePoint {
                z: field(line, &caps, 3, "Z")?,
            });
        }

        if let Some(caps) = patterns.endstop_trim.captures(line) {
            return Ok(MarlinResponse::EndstopTrim(EndstopTrim {
                x: field(line, &caps, 1, "X")?,
                y: field(line, &caps, 2, "Y")?,
                z: field(line, &caps, 3, "Z")?,
            }));
        }

        if let Some(caps) = patterns.delta_geometry.captures(line) {
            return Ok(MarlinResponse::DeltaGeometry(DeltaGeometry {
                rod_length: field(line, &caps, 1, "L")?,
                radius: field(line, &caps, 2, "R")?,
                scale: field(line, &caps, 3, "S")?,
            }));
        }

        Ok(MarlinResponse::Unrecognized(line.to_string()))
    }

    /// Map a raw line from the transport to the device event it represents
    pub fn event_for_line(&self, line: &str) -> DeviceEvent {
        let line = line.trim();
        if line.starts_with("Error:") || line.starts_with("!!") {
            DeviceEvent::Error(line.to_string())
        } else if line.starts_with("T:") || line.starts_with("B:") {
            DeviceEvent::Temperature(line.to_string())
        } else {
            DeviceEvent::LineReceived(line.to_string())
        }
    }
}

fn field(line: &str, caps: &Captures<'_>, index: usize, name: &str) -> Result<f64, FirmwareError> {
    let raw = caps.get(index).map_or("", |m| m.as_str()).trim();
    raw.parse::<f64>()
        .map_err(|e| FirmwareError::ResponseParseError {
            line: line.to_string(),
            reason: format!("{} field '{}': {}", name, raw, e),
        })
}
