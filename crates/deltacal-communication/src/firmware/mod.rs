//! Firmware protocol support
//!
//! Supported controllers:
//! - Marlin (delta kinematics, `ADVANCED_OK` replies)

pub mod marlin;
