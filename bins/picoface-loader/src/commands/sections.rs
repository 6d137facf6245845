//! Sections command - alphabetical index over the catalogue

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use picoface_snapshots::Section;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonSectionsOutput<'a> {
    total_snapshots: usize,
    sections: &'a [Section],
}

/// Run sections command
pub fn run(ctx: &Context) -> Result<()> {
    let catalogue = ctx.catalogue()?;
    let index = catalogue.index();

    if ctx.format.is_json() {
        let output = JsonSectionsOutput {
            total_snapshots: catalogue.len(),
            sections: index.sections(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("  {:<6} {:<10} {}", "Key".dimmed(), "Position".dimmed(), "First".dimmed());
    for section in index.sections() {
        let first = catalogue
            .names()
            .get(section.position)
            .map_or("", String::as_str);
        println!(
            "  {:<6} {:<10} {}",
            section.key.cyan(),
            section.position,
            first
        );
    }
    Ok(())
}
