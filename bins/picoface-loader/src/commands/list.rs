//! List command - print every snapshot in the archive

use super::Context;
use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use picoface_cli::output::format_count;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonListOutput<'a> {
    total: usize,
    snapshots: &'a [String],
}

/// Run list command
pub fn run(ctx: &Context) -> Result<()> {
    let catalogue = ctx.catalogue()?;

    if ctx.format.is_json() {
        let output = JsonListOutput {
            total: catalogue.len(),
            snapshots: catalogue.names(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for name in catalogue.names() {
        println!("{}", name);
    }
    eprintln!(
        "{}",
        format_count(catalogue.len(), "snapshot", "snapshots")
            .if_supports_color(Stream::Stderr, |t| t.dimmed())
    );
    Ok(())
}
