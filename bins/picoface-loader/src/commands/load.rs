//! Load command - upload a snapshot from the archive to the picoFace

use super::Context;
use anyhow::Result;
use picoface_cli::output::{format_duration, format_size, is_interactive};
use picoface_cli::{Status, progress};
use picoface_core::{Error, ResultExt};
use picoface_device::Loader;
use picoface_protocol::{CommandReport, Transport};
use picoface_snapshots::Snapshot;
use picoface_telemetry::{Event, Timer, metrics};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct JsonLoadOutput<'a> {
    snapshot: &'a str,
    port: &'a str,
    duration_ms: u128,
    report: &'a CommandReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<serde_json::Value>,
}

/// Run load command
pub fn run(ctx: &Context, name: &str, port: Option<&str>, show_metrics: bool) -> Result<()> {
    let mut archive = ctx.open_archive()?;
    let snapshot = archive
        .read(name)
        .map_err(Error::from)
        .context(format!("Archive: {}", archive.path().display()))?;
    upload(ctx, &snapshot, port, show_metrics)
}

/// Open the picoFace port and send `snapshot` to it.
pub(crate) fn upload(
    ctx: &Context,
    snapshot: &Snapshot,
    port: Option<&str>,
    show_metrics: bool,
) -> Result<()> {
    let schema = &ctx.config.schema;
    let loader = Loader::new(schema.device.clone(), schema.transfer.clone());

    let spinner =
        (!ctx.format.is_json() && is_interactive()).then(|| progress::spinner("Opening serial port..."));
    let connection = loader.connect(port);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let mut connection = connection?;
    let port_name = connection.port_name().to_string();

    deliver(ctx, &loader, &mut connection, &port_name, snapshot, show_metrics)
}

/// Send `snapshot` over an open transport and report the outcome.
///
/// A device-reported failure is printed first and then returned as
/// `CommandFailed`, so the process still exits non-zero. In JSON mode the
/// failure is left to the error report so stdout holds one document.
pub(crate) fn deliver<T: Transport + ?Sized>(
    ctx: &Context,
    loader: &Loader,
    transport: &mut T,
    port_name: &str,
    snapshot: &Snapshot,
    show_metrics: bool,
) -> Result<()> {
    let registry = metrics();
    registry.gauge("snapshot_bytes", snapshot.data.len() as u64);

    let bar = progress::transfer_bar(
        snapshot.data.len() as u64,
        &snapshot.name,
        !ctx.format.is_json() && is_interactive(),
    );

    let timer = Timer::start("upload_ms");
    let result = loader.upload(transport, &snapshot.data, |p| {
        bar.set_position(p.sent as u64);
    });
    let elapsed = timer.stop();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            registry.increment("uploads_failed");
            progress::finish_error(&bar, &e.message);
            return Err(e.into());
        }
    };

    registry.increment_by("bytes_sent", report.transferred.bytes as u64);
    registry.increment_by("packets_sent", report.transferred.packets as u64);
    if report.succeeded() {
        registry.increment("uploads_succeeded");
        progress::finish_success(&bar, &snapshot.name);
    } else {
        registry.increment("uploads_failed");
        progress::finish_error(&bar, &snapshot.name);
    }

    Event::new(
        "snapshot_upload",
        serde_json::json!({
            "snapshot": snapshot.name,
            "port": port_name,
            "outcome": report.outcome,
            "bytes": report.transferred.bytes,
        }),
    )
    .log();

    if ctx.format.is_json() {
        if report.succeeded() {
            let output = load_output(&snapshot.name, port_name, elapsed, &report, show_metrics);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    } else {
        if report.succeeded() {
            Status::success(&format!(
                "Loaded {} ({}) in {}",
                snapshot.name,
                format_size(report.transferred.bytes as u64),
                format_duration(elapsed)
            ));
        }
        Status::field("Port", port_name);
        if !report.message.trim().is_empty() {
            Status::field("Device", report.message.trim());
        }
        if show_metrics {
            println!("{}", serde_json::to_string_pretty(&registry.export_json())?);
        }
    }

    check_outcome(&report)
}

fn load_output<'a>(
    snapshot: &'a str,
    port: &'a str,
    elapsed: Duration,
    report: &'a CommandReport,
    show_metrics: bool,
) -> JsonLoadOutput<'a> {
    JsonLoadOutput {
        snapshot,
        port,
        duration_ms: elapsed.as_millis(),
        report,
        metrics: show_metrics.then(|| metrics().export_json()),
    }
}

fn check_outcome(report: &CommandReport) -> Result<()> {
    if !report.succeeded() {
        return Err(Error::command_failed(&report.command, &report.message).into());
    }
    Ok(())
}
