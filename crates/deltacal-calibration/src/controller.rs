//! Convergence controller
//!
//! Drives one calibration session:
//!
//! ```text
//! ONLINE -> RESET_DEFAULTS? -> PREHEAT?
//!        -> LOOP { HOME -> PROBE -> STATS -> QUERY -> PLAN/ADJUST }
//!        -> SET_Z_OFFSET -> SAVE -> HOME
//! ```
//!
//! Every command is completed before the next is sent. Any fatal condition
//! ends the session before the Z offset is written or settings are saved.

use crate::gate::Gate;
use crate::planner;
use crate::printer::Printer;
use crate::{probe, query, statistics};
use deltacal_communication::{DeviceLink, MarlinCommand};
use deltacal_core::{
    Axis, CalibrationError, EndstopTrim, MachineParams, PassAggregate, RawSample, Result,
    SessionStatus,
};
use deltacal_settings::CalibrationSettings;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Summary of a converged session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    /// Session identifier
    pub session_id: Uuid,
    /// Passes run, including the converged one
    pub passes: u32,
    /// Tower every pass was measured against
    pub reference_axis: Axis,
    /// Statistics of the converged pass
    pub aggregate: PassAggregate,
    /// Machine parameters read during the converged pass
    pub machine: MachineParams,
    /// Z home offset written to the device
    pub z_offset: f64,
}

impl CalibrationReport {
    /// Report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| deltacal_core::Error::other(e.to_string()))
    }
}

/// Runs calibration passes until the printer is within tolerance
pub struct CalibrationController<L: DeviceLink> {
    printer: Printer<L>,
    settings: CalibrationSettings,
    session: SessionStatus,
}

impl<L: DeviceLink> CalibrationController<L> {
    /// Create a controller for `link`, whose listener must deposit into `gate`
    pub fn new(link: L, gate: Arc<Gate>, settings: CalibrationSettings) -> Self {
        let timeout = settings.response_timeout();
        Self {
            printer: Printer::new(link, gate, timeout),
            settings,
            session: SessionStatus::new(),
        }
    }

    /// The current session
    pub fn session(&self) -> &SessionStatus {
        &self.session
    }

    /// Run the session to convergence
    pub fn run(&mut self) -> Result<CalibrationReport> {
        let span = tracing::info_span!("calibration", session = %self.session.id());
        let _enter = span.enter();

        let endpoint = self.printer.await_online()?;
        tracing::info!("Printer online on {}", endpoint);

        if self.settings.reset_defaults {
            self.reset_defaults()?;
        }
        if self.settings.preheat_bed {
            self.heat_bed()?;
        }

        let (aggregate, machine) = loop {
            if let Some(max) = self.settings.max_passes {
                if self.session.passes() >= max {
                    return Err(CalibrationError::NotConverged {
                        passes: self.session.passes(),
                    }
                    .into());
                }
            }

            let (aggregate, machine, converged) = self.run_pass()?;
            if converged {
                break (aggregate, machine);
            }
        };

        let z_offset = self.finish(&aggregate)?;
        tracing::info!(
            "Calibration converged after {} passes",
            self.session.passes()
        );

        Ok(CalibrationReport {
            session_id: self.session.id(),
            passes: self.session.passes(),
            reference_axis: aggregate.reference_axis,
            aggregate,
            machine,
            z_offset,
        })
    }

    fn reset_defaults(&mut self) -> Result<()> {
        tracing::info!("Resetting endstops, delta radius and Z offset");
        self.printer
            .execute(MarlinCommand::SetEndstopTrim(EndstopTrim::default()))?;
        self.printer.execute(MarlinCommand::SetDeltaRadius(
            self.settings.default_delta_radius,
        ))?;
        self.printer.execute(MarlinCommand::SetZOffset(0.0))
    }

    fn heat_bed(&mut self) -> Result<()> {
        tracing::info!(
            "Heating bed to {:.1}°C",
            self.settings.bed_temperature_c
        );
        self.printer.execute(MarlinCommand::HeatBedAndWait {
            celsius: self.settings.bed_temperature_c,
        })
    }

    fn run_pass(&mut self) -> Result<(PassAggregate, MachineParams, bool)> {
        let pass = self.session.passes() + 1;
        tracing::info!("Pass {}", pass);

        self.printer.execute(MarlinCommand::Home)?;
        let readings = probe::sample_bed(&mut self.printer, self.settings.probe_line_limit)?;
        let sample = RawSample::from_readings(&readings)?;

        let aggregate = statistics::analyze(&sample, &self.session);
        statistics::log_report(&aggregate);

        let machine = query::query_machine(&mut self.printer)?;
        let converged = self.run_adjustments(&aggregate, &machine)?;
        self.session.record_pass(converged);
        Ok((aggregate, machine, converged))
    }

    /// Apply the planned correction; returns whether the pass converged
    fn run_adjustments(
        &mut self,
        aggregate: &PassAggregate,
        machine: &MachineParams,
    ) -> Result<bool> {
        let adjustment = planner::plan(aggregate, machine, self.settings.tolerance_mm);
        match adjustment.command() {
            Some(command) => {
                tracing::info!("Applying {}", command);
                self.printer.execute(command)?;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Set the Z offset below the highest tower, save, and re-home
    fn finish(&mut self, aggregate: &PassAggregate) -> Result<f64> {
        let z_offset = -(aggregate.highest_tower_mean() + self.settings.z_clearance_mm);
        tracing::info!("Setting Z offset to {:.4}", z_offset);

        self.printer.execute(MarlinCommand::SetZOffset(z_offset))?;
        self.printer.execute(MarlinCommand::SaveSettings)?;
        self.printer.execute(MarlinCommand::Home)?;
        Ok(z_offset)
    }
}
