use deltacal_communication::firmware::marlin::response_parser::*;
use deltacal_core::{DeltaGeometry, DeviceEvent, EndstopTrim, FirmwareError};
use proptest::prelude::*;

#[test]
fn test_parse_completion_marker() {
    let parser = MarlinResponseParser::new();
    assert_eq!(
        parser.parse("ok N0 P15 B15"),
        Ok(MarlinResponse::CommandComplete)
    );
    assert_eq!(
        parser.parse("  ok N0 P15 B15\r"),
        Ok(MarlinResponse::CommandComplete)
    );
}

#[test]
fn test_parse_probe_point_keeps_z_only() {
    let parser = MarlinResponseParser::new();
    assert_eq!(
        parser.parse("Bed X: -37.240 Y: -21.500 Z: 0.125"),
        Ok(MarlinResponse::ProbePoint { z: 0.125 })
    );
    assert_eq!(
        parser.parse("Bed X: 0.000 Y: 43.000 Z: -0.04"),
        Ok(MarlinResponse::ProbePoint { z: -0.04 })
    );
}

#[test]
fn test_parse_endstop_trim_with_echo_prefix() {
    let parser = MarlinResponseParser::new();
    assert_eq!(
        parser.parse("echo:  M666 X-0.12 Y0.05 Z0.00"),
        Ok(MarlinResponse::EndstopTrim(EndstopTrim::new(-0.12, 0.05, 0.0)))
    );
}

#[test]
fn test_parse_delta_geometry() {
    let parser = MarlinResponseParser::new();
    assert_eq!(
        parser.parse("echo:  M665 L250.00 R61.70 S200.00"),
        Ok(MarlinResponse::DeltaGeometry(DeltaGeometry {
            rod_length: 250.0,
            radius: 61.7,
            scale: 200.0,
        }))
    );
}

#[test]
fn test_unrecognized_lines_are_not_errors() {
    let parser = MarlinResponseParser::new();
    for line in [
        "echo:busy: processing",
        "echo:; Endstop adjustment:",
        "ok",
        "M666 X0.00",
        "Bed X: 1.0 Y: 2.0",
    ] {
        assert_eq!(
            parser.parse(line),
            Ok(MarlinResponse::Unrecognized(line.to_string())),
            "line: {}",
            line
        );
    }
}

#[test]
fn test_malformed_report_is_an_error() {
    let parser = MarlinResponseParser::new();
    let result = parser.parse("Bed X: 1.0 Y: 2.0 Z: nan-ish");
    assert!(matches!(
        result,
        Err(FirmwareError::ResponseParseError { .. })
    ));

    let result = parser.parse("M665 L250.00 R61.70 H300.00 S200.00");
    assert!(matches!(
        result,
        Err(FirmwareError::ResponseParseError { .. })
    ));
}

#[test]
fn test_event_for_line() {
    let parser = MarlinResponseParser::new();
    assert_eq!(
        parser.event_for_line("Error:Printer halted. kill() called!"),
        DeviceEvent::Error("Error:Printer halted. kill() called!".to_string())
    );
    assert_eq!(
        parser.event_for_line("!! checksum"),
        DeviceEvent::Error("!! checksum".to_string())
    );
    assert_eq!(
        parser.event_for_line(" T:48.20 /50.00 B:48.20 /50.00 @:0 B@:127"),
        DeviceEvent::Temperature("T:48.20 /50.00 B:48.20 /50.00 @:0 B@:127".to_string())
    );
    assert_eq!(
        parser.event_for_line("ok N0 P15 B15"),
        DeviceEvent::LineReceived("ok N0 P15 B15".to_string())
    );
}

proptest! {
    #[test]
    fn test_probe_point_z_survives_formatting(z in -5.0f64..5.0) {
        let parser = MarlinResponseParser::new();
        let line = format!("Bed X: 12.000 Y: -7.500 Z: {:.3}", z);
        let expected: f64 = format!("{:.3}", z).parse().unwrap();
        prop_assert_eq!(parser.parse(&line), Ok(MarlinResponse::ProbePoint { z: expected }));
    }
}
