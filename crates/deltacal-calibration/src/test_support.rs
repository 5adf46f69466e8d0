use crate::gate::GateEvent;
use deltacal_communication::DeviceLink;
use deltacal_core::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Link that records every command and never replies
#[derive(Debug, Default, Clone)]
pub struct RecordingLink {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingLink {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

impl DeviceLink for RecordingLink {
    fn send_command(&mut self, line: &str) -> Result<()> {
        self.sent.lock().push(line.to_string());
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "recording"
    }
}

pub fn line(text: &str) -> GateEvent {
    GateEvent::Line(text.to_string())
}
