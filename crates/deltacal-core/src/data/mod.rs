//! Data models for the calibration session
//!
//! This module provides:
//! - Tower axes of a delta printer
//! - Machine parameters reported by the settings dump (endstop trims, geometry)
//! - Session status carrying the once-chosen reference axis
//! - Probe samples and per-pass aggregates (see [`probe`])

pub mod probe;

use crate::error::CalibrationError;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use uuid::Uuid;

/// Tower axis of a delta printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Z tower
    Z,
    /// X tower
    X,
    /// Y tower
    Y,
}

impl Axis {
    /// Towers in probing order
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::X, Axis::Y];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Z => write!(f, "Z"),
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Per-tower endstop trims (`M666`), in mm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndstopTrim {
    /// X tower trim
    pub x: f64,
    /// Y tower trim
    pub y: f64,
    /// Z tower trim
    pub z: f64,
}

impl EndstopTrim {
    /// Create a trim set
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Trim for one tower
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Delta geometry (`M665`): diagonal rod length, radius and segments scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaGeometry {
    /// Diagonal rod length (L)
    pub rod_length: f64,
    /// Delta radius (R)
    pub radius: f64,
    /// Segments per second (S); passed through, never adjusted
    pub scale: f64,
}

/// Machine parameters as reported by one settings dump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineParams {
    /// Current endstop trims
    pub endstops: EndstopTrim,
    /// Current delta geometry
    pub geometry: DeltaGeometry,
}

impl fmt::Display for MachineParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X {:.4}, Y {:.4}, Z {:.4}, L {:.4}, R {:.4}, S {:.4}",
            self.endstops.x,
            self.endstops.y,
            self.endstops.z,
            self.geometry.rod_length,
            self.geometry.radius,
            self.geometry.scale
        )
    }
}

/// Machine parameters collected while a settings dump is being read
///
/// Either report may be missing until the dump completes; the reports may
/// arrive in any order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MachineState {
    /// Last `M666` report seen
    pub endstops: Option<EndstopTrim>,
    /// Last `M665` report seen
    pub geometry: Option<DeltaGeometry>,
}

impl MachineState {
    /// Finish the dump, failing if either report was never seen
    pub fn into_params(self) -> Result<MachineParams, CalibrationError> {
        let endstops = self
            .endstops
            .ok_or(CalibrationError::MissingField { report: "M666" })?;
        let geometry = self
            .geometry
            .ok_or(CalibrationError::MissingField { report: "M665" })?;
        Ok(MachineParams { endstops, geometry })
    }
}

/// Status of one calibration session
///
/// The reference axis is written at most once; later passes read it back
/// unchanged even when their own averages would pick a different tower.
#[derive(Debug)]
pub struct SessionStatus {
    id: Uuid,
    converged: bool,
    passes: u32,
    reference_axis: OnceCell<Axis>,
}

impl SessionStatus {
    /// Start a new session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            converged: false,
            passes: 0,
            reference_axis: OnceCell::new(),
        }
    }

    /// Session identifier (used in logs and the final report)
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the last pass converged
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Record the outcome of a pass
    pub fn record_pass(&mut self, converged: bool) {
        self.passes += 1;
        self.converged = converged;
    }

    /// Number of completed passes
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// The reference axis, once chosen
    pub fn reference_axis(&self) -> Option<Axis> {
        self.reference_axis.get().copied()
    }

    /// Return the reference axis, choosing it with `select` on first use only
    pub fn reference_axis_or_select(&self, select: impl FnOnce() -> Axis) -> Axis {
        *self.reference_axis.get_or_init(select)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::new()
    }
}
