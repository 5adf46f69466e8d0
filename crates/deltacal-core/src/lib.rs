//! # deltacal Core
//!
//! Core types, errors and device events shared by every deltacal crate.
//! Provides the data model of a calibration session (probe samples, pass
//! aggregates, machine parameters) and the tagged event surface of the
//! device link.

pub mod core;
pub mod data;
pub mod error;

pub use core::{event::DeviceEvent, listener::DeviceListener};

pub use data::{
    probe::{AxisStats, PassAggregate, RawSample, PROBE_POINT_COUNT},
    Axis, DeltaGeometry, EndstopTrim, MachineParams, MachineState, SessionStatus,
};

pub use error::{CalibrationError, ConnectionError, Error, FirmwareError, Result};
