//! Serial port device link
//!
//! Provides the serial transport for direct connection to a printer via USB
//! or RS-232.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Line framing of the inbound byte stream on a dedicated reader thread
//! - Online detection (`M105` probe, re-sent when the board reboots)
//! - Event delivery to a single [`DeviceListener`]

use crate::communication::{ConnectionParams, DeviceLink, SerialParity};
use crate::firmware::marlin::{MarlinCommand, MarlinResponseParser};
use deltacal_core::{ConnectionError, DeviceEvent, DeviceListener, Error, Result};
use parking_lot::Mutex;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Read timeout; bounds how long shutdown waits for the reader thread
const READ_TIMEOUT_MS: u64 = 50;

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,
}

/// List serial ports a printer is likely attached to
///
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::from(ConnectionError::SerialError {
            reason: format!("Failed to enumerate ports: {}", e),
        })
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_printer_port(&port.port_name))
        .map(|port| SerialPortInfo {
            port_name: port.port_name.clone(),
            description: port_description(port),
            manufacturer: match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => usb.manufacturer.clone(),
                _ => None,
            },
        })
        .collect())
}

fn is_printer_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

fn port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

/// Splits an inbound byte stream into trimmed, non-empty lines
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    /// Append bytes and return every line completed by them
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(data));

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim().to_string();
            self.buffer.drain(..=pos);
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }
}

/// Serial device link
///
/// Owns the write half of the port; a reader thread owns a clone and
/// delivers [`DeviceEvent`]s to the listener until the link is dropped.
pub struct SerialDeviceLink {
    port_name: String,
    writer: Mutex<Box<dyn serialport::SerialPort>>,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SerialDeviceLink {
    /// Open the port and start delivering events to `listener`
    ///
    /// `Connected` is reported once the device answers the `M105` probe,
    /// not when the port opens: most boards reset when the port opens and
    /// drop anything sent while booting.
    pub fn open(params: &ConnectionParams, listener: Arc<dyn DeviceListener>) -> Result<Self> {
        params.validate()?;

        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .data_bits(match params.data_bits {
                5 => serialport::DataBits::Five,
                6 => serialport::DataBits::Six,
                7 => serialport::DataBits::Seven,
                _ => serialport::DataBits::Eight,
            })
            .stop_bits(match params.stop_bits {
                2 => serialport::StopBits::Two,
                _ => serialport::StopBits::One,
            })
            .parity(to_serialport_parity(params.parity))
            .flow_control(if params.flow_control {
                serialport::FlowControl::Hardware
            } else {
                serialport::FlowControl::None
            });

        let port = builder.open().map_err(|e| {
            tracing::warn!("Failed to open serial port {}: {}", params.port, e);
            ConnectionError::FailedToOpen {
                port: params.port.clone(),
                reason: e.to_string(),
            }
        })?;
        let reader_port = port.try_clone().map_err(|e| ConnectionError::FailedToOpen {
            port: params.port.clone(),
            reason: format!("cannot clone port handle: {}", e),
        })?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = {
            let shutdown = shutdown.clone();
            let port_name = params.port.clone();
            std::thread::Builder::new()
                .name("deltacal-serial".to_string())
                .spawn(move || read_loop(reader_port, port_name, listener, shutdown))?
        };

        let mut link = Self {
            port_name: params.port.clone(),
            writer: Mutex::new(port),
            shutdown,
            reader: Some(reader),
        };
        link.send_command(&MarlinCommand::ReportTemperature.to_string())?;
        tracing::info!("Opened {} at {} baud", params.port, params.baud_rate);
        Ok(link)
    }
}

impl DeviceLink for SerialDeviceLink {
    fn send_command(&mut self, line: &str) -> Result<()> {
        tracing::trace!("send {}", line);
        let mut port = self.writer.lock();
        write_line(&mut **port, line)
    }

    fn endpoint(&self) -> &str {
        &self.port_name
    }
}

impl Drop for SerialDeviceLink {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                tracing::warn!("Serial reader thread for {} panicked", self.port_name);
            }
        }
    }
}

fn write_line(port: &mut dyn serialport::SerialPort, line: &str) -> Result<()> {
    port.write_all(format!("{}\n", line).as_bytes())
        .and_then(|_| port.flush())
        .map_err(|e| {
            ConnectionError::SerialError {
                reason: format!("write failed: {}", e),
            }
            .into()
        })
}

fn read_loop(
    mut port: Box<dyn serialport::SerialPort>,
    port_name: String,
    listener: Arc<dyn DeviceListener>,
    shutdown: Arc<AtomicBool>,
) {
    let parser = MarlinResponseParser::new();
    let mut framer = LineFramer::default();
    let mut buf = [0u8; 256];
    let mut online = false;

    while !shutdown.load(Ordering::Acquire) {
        let read = match port.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => {
                tracing::error!("Serial read on {} failed: {}", port_name, e);
                let lost = ConnectionError::ConnectionLost {
                    reason: e.to_string(),
                };
                listener.on_event(DeviceEvent::Error(lost.to_string()));
                break;
            }
        };

        for line in framer.push(&buf[..read]) {
            tracing::trace!("recv {}", line);

            if !online {
                if line.starts_with("ok") {
                    online = true;
                    listener.on_event(DeviceEvent::Connected(port_name.clone()));
                } else if line.starts_with("start") {
                    // board rebooted after the port opened; the first probe was lost
                    let probe = MarlinCommand::ReportTemperature.to_string();
                    if let Err(e) = write_line(port.as_mut(), &probe) {
                        listener.on_event(DeviceEvent::Error(e.to_string()));
                    }
                }
                continue;
            }

            listener.on_event(parser.event_for_line(&line));
        }
    }

    listener.on_event(DeviceEvent::Disconnected);
}
