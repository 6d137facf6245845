//! Send command - upload a snapshot file straight from disk

use super::Context;
use anyhow::Result;
use picoface_core::Error;
use std::path::Path;

/// Run send command
pub fn run(ctx: &Context, file: &Path, port: Option<&str>, show_metrics: bool) -> Result<()> {
    if !file.is_file() {
        return Err(Error::file_not_found(file).into());
    }
    let snapshot = picoface_snapshots::read_file(file).map_err(Error::from)?;
    super::load::upload(ctx, &snapshot, port, show_metrics)
}
