use anyhow::{Context, Result};
use clap::Parser;
use deltacal::cli::Args;
use deltacal::{
    init_logging, list_ports, CalibrationController, Config, ConnectionParams, EventSink, Gate,
    SerialDeviceLink, BUILD_DATE, VERSION,
};
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    args.apply(&mut config);
    config.validate()?;

    init_logging(config.debug)?;
    tracing::info!("deltacal {} ({})", VERSION, BUILD_DATE);
    match &args.config {
        Some(path) => tracing::debug!("Loaded config from {}", path.display()),
        None => match Config::default_path() {
            Ok(path) if path.exists() => {
                tracing::debug!("Loaded config from {}", path.display())
            }
            _ => tracing::debug!("No config file found, using defaults"),
        },
    }

    if args.list_ports {
        for port in list_ports()? {
            println!(
                "{}\t{}\t{}",
                port.port_name,
                port.description,
                port.manufacturer.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    let gate = Arc::new(Gate::new());
    let sink = Arc::new(EventSink::new(gate.clone()));
    let params = ConnectionParams::serial(&config.connection.port, config.connection.baud_rate);
    let link = SerialDeviceLink::open(&params, sink)
        .with_context(|| format!("Failed to connect to {}", params.port))?;

    let mut controller = CalibrationController::new(link, gate, config.calibration.clone());
    let session = tokio::task::spawn_blocking(move || controller.run());

    tokio::select! {
        joined = session => {
            match joined? {
                Ok(report) => {
                    tracing::info!("Calibration report:\n{}", report.to_json()?);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("Calibration aborted: {}", e);
                    Err(e.into())
                }
            }
        }
        _ = signal::ctrl_c() => {
            tracing::warn!("Interrupted; the printer may be left mid-calibration");
            std::process::exit(130);
        }
    }
}
