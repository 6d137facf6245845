//! Finding the serial port a picoFace is attached to.

use picoface_core::config::DeviceConfig;
use picoface_core::{Error, Result};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

/// Kind of bus a serial port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Usb,
    Pci,
    Bluetooth,
    Unknown,
}

/// A detected serial port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub port_name: String,
    pub kind: PortKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl DeviceInfo {
    /// A port with no bus information.
    pub fn unknown(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            kind: PortKind::Unknown,
            vid: None,
            pid: None,
            serial_number: None,
            manufacturer: None,
            product: None,
        }
    }

    /// A USB port with the given ids.
    pub fn usb(port_name: impl Into<String>, vid: u16, pid: u16) -> Self {
        Self {
            kind: PortKind::Usb,
            vid: Some(vid),
            pid: Some(pid),
            ..Self::unknown(port_name)
        }
    }

    /// `vid:pid` in hex, if this is a USB port.
    pub fn usb_id(&self) -> Option<String> {
        Some(format!("{:04x}:{:04x}", self.vid?, self.pid?))
    }

    /// Manufacturer and product joined for display.
    pub fn description(&self) -> Option<String> {
        match (&self.manufacturer, &self.product) {
            (Some(m), Some(p)) => Some(format!("{} {}", m, p)),
            (Some(s), None) | (None, Some(s)) => Some(s.clone()),
            (None, None) => None,
        }
    }
}

impl From<SerialPortInfo> for DeviceInfo {
    fn from(info: SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                port_name: info.port_name,
                kind: PortKind::Usb,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                serial_number: usb.serial_number,
                manufacturer: usb.manufacturer,
                product: usb.product,
            },
            SerialPortType::PciPort => Self {
                kind: PortKind::Pci,
                ..Self::unknown(info.port_name)
            },
            SerialPortType::BluetoothPort => Self {
                kind: PortKind::Bluetooth,
                ..Self::unknown(info.port_name)
            },
            _ => Self::unknown(info.port_name),
        }
    }
}

/// Enumerate serial ports on this machine.
pub fn list_ports() -> Result<Vec<DeviceInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        Error::device(format!("Failed to enumerate serial ports: {}", e)).with_source(e)
    })?;
    tracing::debug!(count = ports.len(), "Enumerated serial ports");
    Ok(ports.into_iter().map(DeviceInfo::from).collect())
}

/// Choose the port to use.
///
/// `explicit` (from the command line) wins, then the configured port.
/// Otherwise the first USB port matching the configured vendor/product ids
/// is taken.
pub fn select_port(
    ports: &[DeviceInfo],
    explicit: Option<&str>,
    config: &DeviceConfig,
) -> Result<String> {
    if let Some(port) = explicit.or(config.port.as_deref()) {
        return Ok(port.to_string());
    }

    ports
        .iter()
        .filter(|p| p.kind == PortKind::Usb)
        .find(|p| matches_filter(p, config))
        .map(|p| {
            tracing::info!(port = %p.port_name, usb_id = ?p.usb_id(), "Selected serial port");
            p.port_name.clone()
        })
        .ok_or_else(|| {
            let mut err = Error::device_not_found();
            if config.vid.is_some() || config.pid.is_some() {
                err = err.with_context(format!(
                    "Filtering on vid={} pid={}",
                    config.vid.map_or("any".into(), |v| format!("{:04x}", v)),
                    config.pid.map_or("any".into(), |p| format!("{:04x}", p)),
                ));
            }
            err
        })
}

fn matches_filter(port: &DeviceInfo, config: &DeviceConfig) -> bool {
    config.vid.is_none_or(|vid| port.vid == Some(vid))
        && config.pid.is_none_or(|pid| port.pid == Some(pid))
}
