//! Probe sampler: runs the autolevel routine and collects probe heights

use crate::printer::Printer;
use deltacal_communication::{DeviceLink, MarlinCommand, MarlinResponse};
use deltacal_core::{Result, PROBE_POINT_COUNT};

/// Run one autolevel pass and return the measured heights in arrival order
///
/// Readings are taken from at most `line_limit` reply lines; the completion
/// marker ends the pass early and is never counted as a reading. Output past
/// the limit is consumed and discarded up to the marker so it cannot be read
/// as a reply to the next command. The count is not checked here; see
/// [`RawSample::from_readings`](deltacal_core::RawSample::from_readings).
pub fn sample_bed<L: DeviceLink>(printer: &mut Printer<L>, line_limit: usize) -> Result<Vec<f64>> {
    printer.send(MarlinCommand::ProbeAutolevel)?;

    let mut readings = Vec::with_capacity(PROBE_POINT_COUNT);
    for _ in 0..line_limit {
        match printer.next_response()? {
            MarlinResponse::CommandComplete => return Ok(readings),
            MarlinResponse::ProbePoint { z } => readings.push(z),
            _ => {}
        }
    }

    tracing::warn!(
        "No completion marker within {} lines of autolevel output, discarding the rest",
        line_limit
    );
    printer.await_completion()?;
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;
    use crate::test_support::{line, RecordingLink};
    use std::sync::Arc;

    const PROBE_LINES: [&str; 8] = [
        "Bed X: 0.000 Y: 43.000 Z: 0.100",
        "Bed X: 0.000 Y: 20.000 Z: 0.120",
        "Bed X: -37.240 Y: -21.500 Z: 0.080",
        "Bed X: -17.320 Y: -10.000 Z: 0.090",
        "Bed X: 37.240 Y: -21.500 Z: 0.050",
        "Bed X: 17.320 Y: -10.000 Z: 0.060",
        "Bed X: 0.000 Y: 0.000 Z: 0.090",
        "Bed X: 0.000 Y: 0.000 Z: 0.090",
    ];

    #[test]
    fn test_stops_at_marker_within_limit() {
        let gate = Arc::new(Gate::new());
        for text in PROBE_LINES {
            gate.deposit(line(text));
        }
        gate.deposit(line("ok N0 P15 B15"));
        for text in ["after 1", "after 2", "after 3", "after 4"] {
            gate.deposit(line(text));
        }

        let link = RecordingLink::default();
        let mut printer = Printer::new(link.clone(), gate.clone(), None);
        let readings = sample_bed(&mut printer, 13).unwrap();

        assert_eq!(
            readings,
            vec![0.10, 0.12, 0.08, 0.09, 0.05, 0.06, 0.09, 0.09]
        );
        assert_eq!(link.sent(), vec!["G29 P2 V4".to_string()]);
        assert_eq!(gate.pending(), 4);
    }

    #[test]
    fn test_ignores_unrelated_lines() {
        let gate = Arc::new(Gate::new());
        gate.deposit(line("echo:busy: processing"));
        gate.deposit(line(PROBE_LINES[0]));
        gate.deposit(line("Eqn coefficients: a: 0.0 b: 0.0 d: 0.1"));
        gate.deposit(line(PROBE_LINES[1]));
        gate.deposit(line("ok N0 P15 B15"));

        let mut printer = Printer::new(RecordingLink::default(), gate, None);
        assert_eq!(sample_bed(&mut printer, 13).unwrap(), vec![0.10, 0.12]);
    }

    #[test]
    fn test_line_limit_bounds_reading() {
        let gate = Arc::new(Gate::new());
        for _ in 0..3 {
            for text in PROBE_LINES {
                gate.deposit(line(text));
            }
        }
        gate.deposit(line("ok N0 P15 B15"));
        gate.deposit(line("next reply"));

        let mut printer = Printer::new(RecordingLink::default(), gate.clone(), None);
        let readings = sample_bed(&mut printer, 13).unwrap();
        assert_eq!(readings.len(), 13);
        assert_eq!(gate.pending(), 1);
        assert_eq!(gate.wait(None), Some(line("next reply")));
    }

    #[test]
    fn test_output_past_limit_is_discarded_through_marker() {
        let gate = Arc::new(Gate::new());
        for text in PROBE_LINES {
            gate.deposit(line(text));
        }
        for _ in 0..6 {
            gate.deposit(line("Bed Topography Report:"));
        }
        gate.deposit(line("ok N0 P15 B15"));
        gate.deposit(line("echo:  M666 X0.00 Y0.00 Z0.00"));

        let mut printer = Printer::new(RecordingLink::default(), gate.clone(), None);
        let readings = sample_bed(&mut printer, 13).unwrap();
        assert_eq!(
            readings,
            vec![0.10, 0.12, 0.08, 0.09, 0.05, 0.06, 0.09, 0.09]
        );
        assert_eq!(
            gate.wait(None),
            Some(line("echo:  M666 X0.00 Y0.00 Z0.00"))
        );
    }
}
