//! # deltacal Calibration
//!
//! The calibration control loop for Marlin delta printers.
//!
//! A single controller thread issues one command at a time and blocks on the
//! [`Gate`](gate::Gate) until the device link's event stream, delivered
//! through the [`EventSink`](sink::EventSink), produces the reply. Each pass
//! probes the bed, queries the machine state, and applies at most one
//! correction; once a pass converges the Z offset is set and saved.

pub mod controller;
pub mod gate;
pub mod planner;
pub mod printer;
pub mod probe;
pub mod query;
pub mod sink;
pub mod statistics;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{CalibrationController, CalibrationReport};
pub use gate::{Gate, GateEvent};
pub use planner::Adjustment;
pub use printer::Printer;
pub use sink::EventSink;
