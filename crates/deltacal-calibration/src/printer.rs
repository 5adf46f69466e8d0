//! Request/response helper over a device link and its gate
//!
//! Commands are strictly sequential: one is sent, then replies are consumed
//! from the gate until the completion marker. Every wait checks the gate's
//! error flag afterwards, and a raised flag aborts the session.

use crate::gate::{Gate, GateEvent};
use deltacal_communication::{DeviceLink, MarlinCommand, MarlinResponse, MarlinResponseParser};
use deltacal_core::{CalibrationError, Result};
use std::sync::Arc;
use std::time::Duration;

/// A printer driven through a [`DeviceLink`] whose events feed a [`Gate`]
pub struct Printer<L: DeviceLink> {
    link: L,
    gate: Arc<Gate>,
    parser: MarlinResponseParser,
    timeout: Option<Duration>,
}

impl<L: DeviceLink> Printer<L> {
    /// Wrap `link`; `gate` must be the one its listener deposits into
    pub fn new(link: L, gate: Arc<Gate>, timeout: Option<Duration>) -> Self {
        Self {
            link,
            gate,
            parser: MarlinResponseParser::new(),
            timeout,
        }
    }

    /// The underlying link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Send one command without waiting
    pub fn send(&mut self, command: MarlinCommand) -> Result<()> {
        tracing::debug!("{} <- {}", self.link.endpoint(), command);
        self.link.send_command(&command.to_string())
    }

    /// Send one command and consume its replies up to the completion marker
    pub fn execute(&mut self, command: MarlinCommand) -> Result<()> {
        self.send(command)?;
        self.await_completion()
    }

    /// Block until the device reports it is online
    ///
    /// Whatever the device printed while booting is discarded so it cannot be
    /// mistaken for a reply.
    pub fn await_online(&self) -> Result<String> {
        loop {
            match self.next_event()? {
                GateEvent::Connected(endpoint) => {
                    let stale = self.gate.discard_pending();
                    if stale > 0 {
                        tracing::debug!("Discarded {} banner lines", stale);
                    }
                    return Ok(endpoint);
                }
                GateEvent::Disconnected => return Err(CalibrationError::Disconnected.into()),
                GateEvent::Line(line) => tracing::trace!("pre-online: {}", line),
                GateEvent::Error(message) => {
                    return Err(CalibrationError::DeviceError { message }.into())
                }
            }
        }
    }

    /// Consume reply lines until the completion marker
    pub fn await_completion(&self) -> Result<()> {
        loop {
            if self.next_response()? == MarlinResponse::CommandComplete {
                return Ok(());
            }
        }
    }

    /// Wait for the next reply line and classify it
    ///
    /// A line that matches a known report but carries a non-numeric field is
    /// an error rather than being skipped.
    pub fn next_response(&self) -> Result<MarlinResponse> {
        loop {
            match self.next_event()? {
                GateEvent::Line(line) => return Ok(self.parser.parse(&line)?),
                GateEvent::Disconnected => return Err(CalibrationError::Disconnected.into()),
                GateEvent::Connected(endpoint) => {
                    tracing::warn!("Unexpected reconnect on {}", endpoint)
                }
                GateEvent::Error(message) => {
                    return Err(CalibrationError::DeviceError { message }.into())
                }
            }
        }
    }

    fn next_event(&self) -> Result<GateEvent> {
        let event = self.gate.wait(self.timeout).ok_or_else(|| {
            CalibrationError::ResponseTimeout {
                timeout_ms: self.timeout.map_or(0, |t| t.as_millis() as u64),
            }
        })?;

        if let Some(message) = self.gate.take_error() {
            tracing::error!("Device error: {}", message);
            return Err(CalibrationError::DeviceError { message }.into());
        }
        Ok(event)
    }
}
