//! Config command - show the effective configuration

use super::Context;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonConfigOutput<'a> {
    path: Option<String>,
    archive: Option<String>,
    config: &'a picoface_core::config::ConfigSchema,
}

/// Run config command
pub fn run(ctx: &Context) -> Result<()> {
    let archive = ctx.archive_path().map(|p| p.display().to_string());

    if ctx.format.is_json() {
        let output = JsonConfigOutput {
            path: ctx.config.path.as_ref().map(|p| p.display().to_string()),
            archive,
            config: &ctx.config.schema,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &ctx.config.path {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in defaults"),
    }
    if let Some(archive) = archive {
        println!("# Archive in use: {}", archive);
    }
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
