//! Machine state query: reads endstop trims and delta geometry from a settings dump

use crate::printer::Printer;
use deltacal_communication::{DeviceLink, MarlinCommand, MarlinResponse};
use deltacal_core::{MachineParams, MachineState, Result};

/// Dump the device settings and extract the current machine parameters
///
/// The `M666` and `M665` reports may arrive in either order; when a report
/// repeats, the last one wins. A dump that completes without both reports
/// fails with [`CalibrationError::MissingField`](deltacal_core::CalibrationError::MissingField).
pub fn query_machine<L: DeviceLink>(printer: &mut Printer<L>) -> Result<MachineParams> {
    printer.send(MarlinCommand::DumpSettings)?;

    let mut state = MachineState::default();
    loop {
        match printer.next_response()? {
            MarlinResponse::CommandComplete => break,
            MarlinResponse::EndstopTrim(trim) => state.endstops = Some(trim),
            MarlinResponse::DeltaGeometry(geometry) => state.geometry = Some(geometry),
            MarlinResponse::ProbePoint { .. } | MarlinResponse::Unrecognized(_) => {}
        }
    }

    let params = state.into_params()?;
    tracing::info!("{}", params);
    Ok(params)
}
