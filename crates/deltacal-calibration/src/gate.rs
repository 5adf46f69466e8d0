//! Synchronization gate between the device event stream and the controller
//!
//! The event path deposits, the controller waits. Events are queued in
//! arrival order, so a notification delivered before the controller starts
//! waiting is kept rather than lost. Error events additionally raise a flag
//! the controller checks after each wait.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Event as seen by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    /// Device came online
    Connected(String),
    /// Response line
    Line(String),
    /// Error reported by the device link
    Error(String),
    /// Link closed
    Disconnected,
}

#[derive(Debug, Default)]
struct GateState {
    pending: VecDeque<GateEvent>,
    error: Option<String>,
}

/// Mutex/condition pair guarding the pending events and the error flag
#[derive(Debug, Default)]
pub struct Gate {
    state: Mutex<GateState>,
    signal: Condvar,
}

impl Gate {
    /// Create an empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event and wake one waiter
    pub fn deposit(&self, event: GateEvent) {
        let mut state = self.state.lock();
        if let GateEvent::Error(message) = &event {
            state.error = Some(message.clone());
        }
        state.pending.push_back(event);
        drop(state);
        self.signal.notify_one();
    }

    /// Take the oldest event, blocking until one arrives
    ///
    /// With a timeout, returns `None` if nothing arrived in time; without
    /// one, waits indefinitely.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<GateEvent> {
        let mut state = self.state.lock();
        match timeout {
            None => {
                while state.pending.is_empty() {
                    self.signal.wait(&mut state);
                }
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                while state.pending.is_empty() {
                    if self.signal.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
            }
        }
        state.pending.pop_front()
    }

    /// Clear the error flag, returning the message that raised it
    pub fn take_error(&self) -> Option<String> {
        self.state.lock().error.take()
    }

    /// Drop every queued event except errors; returns how many were dropped
    pub fn discard_pending(&self) -> usize {
        let mut state = self.state.lock();
        let before = state.pending.len();
        state
            .pending
            .retain(|event| matches!(event, GateEvent::Error(_)));
        before - state.pending.len()
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }
}
