//! Error handling for deltacal
//!
//! Provides error types for all layers of the application:
//! - Calibration errors (session-fatal conditions of the control loop)
//! - Connection errors (transport)
//! - Firmware errors (malformed device output)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Calibration error type
///
/// Every variant is fatal to the session: the control loop never retries a
/// pass and never writes settings to the device once one of these is raised.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// The device link reported an error while a reply was awaited
    #[error("Device reported an error: {message}")]
    DeviceError {
        /// The error text delivered by the link.
        message: String,
    },

    /// A probing pass did not yield exactly the expected number of readings
    #[error("Invalid result count from bed autolevel routine ({count}): {readings:?}")]
    SampleCount {
        /// Number of readings collected.
        count: usize,
        /// The readings that were collected.
        readings: Vec<f64>,
    },

    /// The settings dump completed without one of the expected reports
    #[error("Settings dump completed without a {report} report")]
    MissingField {
        /// The report that was never seen (`M666` or `M665`).
        report: &'static str,
    },

    /// No reply arrived within the configured response timeout
    #[error("No response from device after {timeout_ms}ms")]
    ResponseTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The device disconnected mid-session
    #[error("Device disconnected during calibration")]
    Disconnected,

    /// The configured pass limit was reached before convergence
    #[error("Calibration did not converge after {passes} passes")]
    NotConverged {
        /// Number of passes run.
        passes: u32,
    },
}

/// Connection error type
///
/// Represents errors raised while opening or using the transport.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Connection lost
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Serial port error
    #[error("Serial port error: {reason}")]
    SerialError {
        /// The reason for the serial port error.
        reason: String,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },
}

/// Firmware error type
///
/// Represents device output that matched a known report but could not be
/// decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FirmwareError {
    /// Response parsing error
    #[error("Failed to parse firmware response '{line}': {reason}")]
    ResponseParseError {
        /// The offending line.
        line: String,
        /// The reason the response parsing failed.
        reason: String,
    },
}

/// Main error type for deltacal
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Calibration error
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Firmware error
    #[error(transparent)]
    Firmware(#[from] FirmwareError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Calibration(CalibrationError::ResponseTimeout { .. })
        )
    }

    /// Check if this is a calibration error
    pub fn is_calibration_error(&self) -> bool {
        matches!(self, Error::Calibration(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
