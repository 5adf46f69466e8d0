//! Device listener interface
//!
//! Defines the listener trait the device link delivers its events to

use crate::core::event::DeviceEvent;

/// Listener trait for device link events
///
/// Called from the link's I/O thread, so implementations must be cheap
/// and must never block on the controller.
pub trait DeviceListener: Send + Sync {
    /// Called for every event the device link produces
    fn on_event(&self, event: DeviceEvent);
}

