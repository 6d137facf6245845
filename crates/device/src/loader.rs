//! Uploading snapshots to a connected picoFace.

use crate::connection::Connection;
use crate::discovery::{list_ports, select_port};
use picoface_core::config::{DeviceConfig, TransferConfig};
use picoface_core::Result;
use picoface_protocol::{CommandReport, Progress, Session, Transport};

/// Connects to the picoFace and runs uploads with the configured settings.
#[derive(Debug, Clone)]
pub struct Loader {
    device: DeviceConfig,
    transfer: TransferConfig,
}

impl Loader {
    pub fn new(device: DeviceConfig, transfer: TransferConfig) -> Self {
        Self { device, transfer }
    }

    /// Open the picoFace port, auto-detecting it unless one is given.
    pub fn connect(&self, explicit_port: Option<&str>) -> Result<Connection> {
        let port_name = if explicit_port.is_some() || self.device.port.is_some() {
            select_port(&[], explicit_port, &self.device)?
        } else {
            select_port(&list_ports()?, None, &self.device)?
        };
        Connection::open(&port_name, &self.device)
    }

    /// Upload snapshot bytes over `transport`.
    ///
    /// A device-reported failure comes back as a report, not an error.
    pub fn upload<T, F>(&self, transport: &mut T, data: &[u8], on_progress: F) -> Result<CommandReport>
    where
        T: Transport + ?Sized,
        F: FnMut(Progress),
    {
        tracing::info!(bytes = data.len(), "Uploading snapshot");
        let report = Session::new(transport)
            .with_packet_size(self.transfer.packet_size)
            .upload_snapshot(data, on_progress)?;

        if report.succeeded() {
            tracing::info!(message = %report.message, "Snapshot loaded");
        } else {
            tracing::warn!(message = %report.message, "Device rejected snapshot");
        }
        Ok(report)
    }
}
