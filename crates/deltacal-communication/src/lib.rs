//! # deltacal Communication
//!
//! Device link abstraction, serial transport and Marlin protocol support.
//! The link decodes the byte stream into lines and reports them, together
//! with connection changes and errors, as [`DeviceEvent`](deltacal_core::DeviceEvent)s.

pub mod communication;
pub mod firmware;

pub use communication::{
    serial::{list_ports, SerialDeviceLink, SerialPortInfo},
    ConnectionParams, DeviceLink, SerialParity,
};

pub use firmware::marlin::{MarlinCommand, MarlinResponse, MarlinResponseParser};
