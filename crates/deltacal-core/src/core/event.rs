//! Event types for device link notifications
//!
//! Provides:
//! - One tagged event type covering every notification the device link emits
//! - A short kind tag used as a log field

/// Device link event types
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Device came online on the given port
    Connected(String),
    /// Connection closed or lost
    Disconnected,
    /// A decoded response line
    LineReceived(String),
    /// The device or the transport reported an error
    Error(String),
    /// Temperature report emitted while heating
    Temperature(String),
}

impl DeviceEvent {
    /// Event kind as a short lowercase tag (used in log fields)
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceEvent::Connected(_) => "connected",
            DeviceEvent::Disconnected => "disconnected",
            DeviceEvent::LineReceived(_) => "line",
            DeviceEvent::Error(_) => "error",
            DeviceEvent::Temperature(_) => "temperature",
        }
    }
}

impl std::fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceEvent::Connected(port) => write!(f, "Connected to {}", port),
            DeviceEvent::Disconnected => write!(f, "Disconnected"),
            DeviceEvent::LineReceived(line) => write!(f, "recv {}", line),
            DeviceEvent::Error(msg) => write!(f, "Error: {}", msg),
            DeviceEvent::Temperature(line) => write!(f, "temp {}", line),
        }
    }
}
