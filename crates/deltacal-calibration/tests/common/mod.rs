//! Simulated Marlin delta printer for session tests

#![allow(dead_code)]

use deltacal_calibration::{CalibrationController, EventSink, Gate};
use deltacal_communication::{DeviceLink, MarlinResponseParser};
use deltacal_core::{DeviceEvent, DeviceListener, Result};
use deltacal_settings::CalibrationSettings;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const OK: &str = "ok N0 P15 B15";

/// Radius at which the simulated center reads `center_base`
const NOMINAL_RADIUS: f64 = 61.7;

/// Simulated printer state
///
/// Each tower reads `base - trim`; the center rises by half of any radius
/// increase over the nominal radius.
#[derive(Debug, Clone)]
pub struct SimState {
    pub sent: Vec<String>,
    pub base: [f64; 3],
    pub trim: [f64; 3],
    pub center_base: f64,
    pub radius: f64,
    pub z_offset: f64,
    pub saved: bool,
    /// Canned replies by command code, used instead of the simulated ones
    pub overrides: HashMap<String, Vec<String>>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            sent: Vec::new(),
            base: [0.30, 0.20, 0.25],
            trim: [0.0; 3],
            center_base: 0.15,
            radius: NOMINAL_RADIUS,
            z_offset: 0.0,
            saved: false,
            overrides: HashMap::new(),
        }
    }
}

impl SimState {
    fn reply(&mut self, command: &str) -> Vec<String> {
        let mut words = command.split_whitespace();
        let code = words.next().unwrap_or_default().to_string();
        if let Some(lines) = self.overrides.get(&code) {
            return lines.clone();
        }

        let mut lines = Vec::new();
        match code.as_str() {
            "G28" => lines.push("echo:busy: processing".to_string()),
            "G29" => {
                let coords = [
                    (0.0, 43.0),
                    (0.0, 20.0),
                    (-37.24, -21.5),
                    (-17.32, -10.0),
                    (37.24, -21.5),
                    (17.32, -10.0),
                ];
                for (tower, pair) in coords.chunks(2).enumerate() {
                    let height = self.base[tower] - self.trim[tower];
                    lines.push(bed_line(pair[0], height + 0.005));
                    lines.push(bed_line(pair[1], height - 0.005));
                }
                let center = self.center_base + 0.5 * (self.radius - NOMINAL_RADIUS);
                lines.push(bed_line((0.0, 0.0), center));
                lines.push(bed_line((0.0, 0.0), center));
            }
            "M503" => {
                lines.push("echo:; Steps per unit:".to_string());
                lines.push("echo:  M92 X80.00 Y80.00 Z80.00 E96.00".to_string());
                lines.push(format!(
                    "echo:  M665 L125.00 R{:.4} S200.00",
                    self.radius
                ));
                lines.push(format!(
                    "echo:  M666 X{:.4} Y{:.4} Z{:.4}",
                    self.trim[1], self.trim[2], self.trim[0]
                ));
            }
            "M666" => {
                for word in words {
                    let (axis, value) = word.split_at(1);
                    let value: f64 = value.parse().unwrap_or_default();
                    match axis {
                        "Z" => self.trim[0] = value,
                        "X" => self.trim[1] = value,
                        "Y" => self.trim[2] = value,
                        _ => {}
                    }
                }
            }
            "M665" => self.radius = argument(words.next(), 'R'),
            "M206" => self.z_offset = argument(words.next(), 'Z'),
            "M190" => {
                lines.push("T:21.3 /0.0 B:45.1 /50.0 @:0 B@:127".to_string());
                lines.push("T:21.3 /0.0 B:50.0 /50.0 @:0 B@:0".to_string());
            }
            "M500" => {
                self.saved = true;
                lines.push("echo:Settings Stored".to_string());
            }
            _ => {}
        }
        lines.push(OK.to_string());
        lines
    }
}

fn bed_line((x, y): (f64, f64), z: f64) -> String {
    format!("Bed X: {:.3} Y: {:.3} Z: {:.4}", x, y, z)
}

fn argument(word: Option<&str>, prefix: char) -> f64 {
    word.and_then(|w| w.strip_prefix(prefix))
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Device link answering every command synchronously from [`SimState`]
pub struct SimulatedDelta {
    state: Arc<Mutex<SimState>>,
    listener: Arc<dyn DeviceListener>,
    parser: MarlinResponseParser,
}

impl DeviceLink for SimulatedDelta {
    fn send_command(&mut self, line: &str) -> Result<()> {
        let replies = {
            let mut state = self.state.lock();
            state.sent.push(line.to_string());
            state.reply(line)
        };
        for reply in replies {
            self.listener.on_event(self.parser.event_for_line(&reply));
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "sim"
    }
}

/// Handles onto a simulated session
pub struct Harness {
    pub state: Arc<Mutex<SimState>>,
    pub sink: Arc<EventSink>,
    pub gate: Arc<Gate>,
}

impl Harness {
    pub fn new(state: SimState) -> Self {
        let gate = Arc::new(Gate::new());
        Self {
            state: Arc::new(Mutex::new(state)),
            sink: Arc::new(EventSink::new(gate.clone())),
            gate,
        }
    }

    pub fn controller(&self, settings: CalibrationSettings) -> CalibrationController<SimulatedDelta> {
        let link = SimulatedDelta {
            state: self.state.clone(),
            listener: self.sink.clone(),
            parser: MarlinResponseParser::new(),
        };
        CalibrationController::new(link, self.gate.clone(), settings)
    }

    pub fn connect(&self) {
        self.sink
            .on_event(DeviceEvent::Connected("sim".to_string()));
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    pub fn override_reply(&self, code: &str, lines: &[&str]) {
        self.state.lock().overrides.insert(
            code.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
    }
}
