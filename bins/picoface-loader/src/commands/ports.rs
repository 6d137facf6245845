//! Ports command - list serial ports and mark the one `load` would pick

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use picoface_cli::Status;
use picoface_device::{DeviceInfo, list_ports, select_port};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonPortsOutput {
    total: usize,
    selected: Option<String>,
    ports: Vec<DeviceInfo>,
}

/// Run ports command
pub fn run(ctx: &Context) -> Result<()> {
    let ports = list_ports()?;
    // Not finding the picoFace is information here, not a failure
    let selected = select_port(&ports, None, &ctx.config.schema.device).ok();

    if ctx.format.is_json() {
        let output = JsonPortsOutput {
            total: ports.len(),
            selected,
            ports,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ports.is_empty() {
        Status::warning("No serial ports detected");
        return Ok(());
    }

    for port in &ports {
        let marker = if selected.as_deref() == Some(port.port_name.as_str()) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<20} {:<10} {:<10} {}",
            marker,
            port.port_name,
            format!("{:?}", port.kind).to_lowercase(),
            port.usb_id().unwrap_or_default(),
            port.description().unwrap_or_default().dimmed()
        );
    }
    Ok(())
}
