//! Event sink: the device listener that feeds the gate

use crate::gate::{Gate, GateEvent};
use deltacal_core::{DeviceEvent, DeviceListener};
use std::sync::Arc;

/// Classifies device events and deposits the ones the controller consumes
///
/// Temperature reports are logged only; nothing waits on them.
#[derive(Debug, Clone)]
pub struct EventSink {
    gate: Arc<Gate>,
}

impl EventSink {
    /// Create a sink feeding `gate`
    pub fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }
}

impl DeviceListener for EventSink {
    fn on_event(&self, event: DeviceEvent) {
        tracing::debug!(kind = event.kind(), "{}", event);

        let deposit = match event {
            DeviceEvent::Connected(port) => GateEvent::Connected(port),
            DeviceEvent::LineReceived(line) => GateEvent::Line(line),
            DeviceEvent::Error(message) => GateEvent::Error(message),
            DeviceEvent::Disconnected => GateEvent::Disconnected,
            DeviceEvent::Temperature(_) => return,
        };
        self.gate.deposit(deposit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_maps_every_event() {
        let gate = Arc::new(Gate::new());
        let sink = EventSink::new(gate.clone());

        sink.on_event(DeviceEvent::Connected("sim".to_string()));
        sink.on_event(DeviceEvent::LineReceived("ok N0 P15 B15".to_string()));
        sink.on_event(DeviceEvent::Temperature("T:49.8 /50.0".to_string()));
        sink.on_event(DeviceEvent::Error("Error:checksum".to_string()));
        sink.on_event(DeviceEvent::Disconnected);

        assert_eq!(gate.pending(), 4);
        assert_eq!(gate.wait(None), Some(GateEvent::Connected("sim".to_string())));
        assert_eq!(
            gate.wait(None),
            Some(GateEvent::Line("ok N0 P15 B15".to_string()))
        );
        assert_eq!(
            gate.wait(None),
            Some(GateEvent::Error("Error:checksum".to_string()))
        );
        assert_eq!(gate.wait(None), Some(GateEvent::Disconnected));
        assert_eq!(gate.take_error(), Some("Error:checksum".to_string()));
    }
}
