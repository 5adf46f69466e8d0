//! Probe samples and per-pass aggregates

use super::Axis;
use crate::error::CalibrationError;
use serde::{Deserialize, Serialize};

/// Readings produced by one autolevel pass: two per tower plus two at the center
pub const PROBE_POINT_COUNT: usize = 8;

/// Raw readings of one probing pass, in arrival order Z, X, Y, C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Readings near the Z tower
    pub z: [f64; 2],
    /// Readings near the X tower
    pub x: [f64; 2],
    /// Readings near the Y tower
    pub y: [f64; 2],
    /// Readings at the bed center
    pub c: [f64; 2],
}

impl RawSample {
    /// Build a sample from the readings of one pass
    ///
    /// Anything other than exactly [`PROBE_POINT_COUNT`] readings is rejected;
    /// readings are never padded or truncated.
    pub fn from_readings(readings: &[f64]) -> Result<Self, CalibrationError> {
        match *readings {
            [z1, z2, x1, x2, y1, y2, c1, c2] => Ok(Self {
                z: [z1, z2],
                x: [x1, x2],
                y: [y1, y2],
                c: [c1, c2],
            }),
            _ => Err(CalibrationError::SampleCount {
                count: readings.len(),
                readings: readings.to_vec(),
            }),
        }
    }

    /// Readings for one tower
    pub fn tower(&self, axis: Axis) -> [f64; 2] {
        match axis {
            Axis::Z => self.z,
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Mean and population variance of one reading pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (divided by the reading count)
    pub variance: f64,
}

/// Statistics derived from one probing pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassAggregate {
    /// Z tower statistics
    pub z: AxisStats,
    /// X tower statistics
    pub x: AxisStats,
    /// Y tower statistics
    pub y: AxisStats,
    /// Center statistics
    pub c: AxisStats,
    /// Session reference axis
    pub reference_axis: Axis,
    /// Mean of the reference axis in this pass
    pub high_point: f64,
    /// Center mean minus high point
    pub c_offset: f64,
}

impl PassAggregate {
    /// Statistics for one tower
    pub fn tower(&self, axis: Axis) -> &AxisStats {
        match axis {
            Axis::Z => &self.z,
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Tower mean minus the high point
    pub fn deviation(&self, axis: Axis) -> f64 {
        self.tower(axis).mean - self.high_point
    }

    /// Greatest tower mean of this pass (center excluded)
    pub fn highest_tower_mean(&self) -> f64 {
        self.z.mean.max(self.x.mean).max(self.y.mean)
    }
}
