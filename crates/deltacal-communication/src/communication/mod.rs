//! Device link abstraction
//!
//! A device link carries one command line at a time to the printer and
//! reports everything it receives to a [`DeviceListener`](deltacal_core::DeviceListener).
//! Line framing, connection detection and transport errors are the link's
//! concern; callers only ever see whole lines.

pub mod serial;

use deltacal_core::{ConnectionError, Result};
use serde::{Deserialize, Serialize};

/// Outbound half of a device link
pub trait DeviceLink: Send {
    /// Send one command line (without line terminator)
    fn send_command(&mut self, line: &str) -> Result<()>;

    /// Identifier of the endpoint this link talks to
    fn endpoint(&self) -> &str;
}

/// Serial parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialParity {
    /// No parity
    #[default]
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Parameters for opening a serial device link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Port name (e.g. "/dev/ttyUSB0", "COM8")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1-2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
    /// Hardware flow control
    pub flow_control: bool,
}

impl ConnectionParams {
    /// 8N1 parameters for a port
    pub fn serial(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            ..Self::default()
        }
    }

    /// Check the parameters before touching the port
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(invalid("port name is empty"));
        }
        if self.baud_rate == 0 {
            return Err(invalid("baud rate must be > 0"));
        }
        if !(5..=8).contains(&self.data_bits) {
            return Err(invalid(format!("invalid data bits: {}", self.data_bits)));
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(invalid(format!("invalid stop bits: {}", self.stop_bits)));
        }
        Ok(())
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 115200,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            flow_control: false,
        }
    }
}

fn invalid(reason: impl Into<String>) -> deltacal_core::Error {
    ConnectionError::InvalidParameters {
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_params_default_to_8n1() {
        let params = ConnectionParams::serial("/dev/ttyUSB0", 250000);
        assert_eq!(params.baud_rate, 250000);
        assert_eq!(params.data_bits, 8);
        assert_eq!(params.stop_bits, 1);
        assert_eq!(params.parity, SerialParity::None);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        assert!(ConnectionParams::serial("", 115200).validate().is_err());
        assert!(ConnectionParams::serial("COM8", 0).validate().is_err());

        let mut params = ConnectionParams::serial("COM8", 115200);
        params.data_bits = 9;
        assert!(params.validate().is_err());

        let mut params = ConnectionParams::serial("COM8", 115200);
        params.stop_bits = 3;
        assert!(params.validate().is_err());
    }
}
