//! Adjustment planner
//!
//! Decides the single correction a pass applies. Tower trims come first:
//! the radius is only corrected once every tower is within tolerance of the
//! high point.

use deltacal_communication::MarlinCommand;
use deltacal_core::{Axis, EndstopTrim, MachineParams, PassAggregate};
use serde::Serialize;

/// The outcome of planning one pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Adjustment {
    /// Replace all three endstop trims
    EndstopTrim(EndstopTrim),
    /// Replace the delta radius
    DeltaRadius(f64),
    /// Nothing to correct
    Converged,
}

impl Adjustment {
    /// The command applying this adjustment, if any
    pub fn command(&self) -> Option<MarlinCommand> {
        match *self {
            Adjustment::EndstopTrim(trim) => Some(MarlinCommand::SetEndstopTrim(trim)),
            Adjustment::DeltaRadius(radius) => Some(MarlinCommand::SetDeltaRadius(radius)),
            Adjustment::Converged => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Adjustment::Converged)
    }
}

/// Plan the correction for one pass
pub fn plan(aggregate: &PassAggregate, params: &MachineParams, tolerance: f64) -> Adjustment {
    let mut towers_off = false;
    for axis in Axis::ALL {
        let offset = aggregate.high_point - aggregate.tower(axis).mean;
        if offset.abs() > tolerance {
            tracing::warn!("{} tower offset too great: {:.4}", axis, offset);
            towers_off = true;
        }
    }

    if towers_off {
        let trim = |axis| params.endstops.get(axis) + aggregate.deviation(axis);
        return Adjustment::EndstopTrim(EndstopTrim::new(
            trim(Axis::X),
            trim(Axis::Y),
            trim(Axis::Z),
        ));
    }

    if aggregate.c_offset.abs() > tolerance {
        tracing::warn!("Center offset too great: {:.4}", aggregate.c_offset);
        return Adjustment::DeltaRadius(params.geometry.radius - 2.0 * aggregate.c_offset);
    }

    Adjustment::Converged
}
