//! picoFace loader
//!
//! Browse a zip archive of ZX Spectrum snapshots and upload them to a
//! picoFace interface over its USB serial port.

use clap::{Parser, Subcommand};
use owo_colors::{OwoColorize, Stream, Style};
use picoface_cli::OutputFormat;
use picoface_core::config::Config;
use picoface_core::error::exit_codes;
use picoface_core::{Error, ErrorCode};
use picoface_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{Context, config, list, load, ports, search, sections, send};

/// Load ZX Spectrum snapshots into a picoFace
#[derive(Parser)]
#[command(name = "picoface-loader")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .picoface.toml or the user config dir)
    #[arg(long, global = true, env = "PICOFACE_CONFIG")]
    config: Option<PathBuf>,

    /// Snapshot archive to use instead of the configured/discovered one
    #[arg(long, global = true, env = "PICOFACE_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every snapshot in the archive
    List,

    /// Find snapshots by name
    Search {
        /// Text to look for
        query: String,

        /// Rank by relevance (substring and fuzzy matches) instead of prefix filtering
        #[arg(long)]
        fuzzy: bool,
    },

    /// Show the alphabetical section index
    Sections,

    /// List serial ports and which one would be used
    Ports,

    /// Upload a snapshot from the archive
    Load {
        /// Snapshot name as shown by `list`
        name: String,

        /// Serial port (auto-detected if omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Print transfer metrics after the upload
        #[arg(long)]
        metrics: bool,
    },

    /// Upload a snapshot file from disk
    Send {
        /// Path to the snapshot file
        file: PathBuf,

        /// Serial port (auto-detected if omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Print transfer metrics after the upload
        #[arg(long)]
        metrics: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e, format),
    }
}

/// Print `e` in the requested format and pick the exit code.
fn report_error(e: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let error = e.downcast_ref::<Error>();

    if format.is_json() {
        let report = match error {
            Some(err) => err.to_report(),
            None => Error::new(ErrorCode::Unknown, format!("{:#}", e)).to_report(),
        };
        match serde_json::to_string_pretty(&serde_json::json!({ "error": report })) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("Error: {}", e),
        }
    } else {
        eprintln!(
            "{} {}",
            "Error:".if_supports_color(Stream::Stderr, |t| t.style(Style::new().red().bold())),
            e
        );
    }

    let code = error.map_or(exit_codes::FAILURE, Error::exit_code);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let logging = &config.schema.logging;
    let _guard = picoface_telemetry::init_with_config(TelemetryConfig {
        log_level: if cli.verbose {
            "picoface=debug".to_string()
        } else {
            logging.level.clone()
        },
        log_dir: logging.log_dir.clone(),
        show_target: logging.show_target || cli.verbose,
        ..TelemetryConfig::default()
    })?;

    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Using configuration file");
    }

    let ctx = Context {
        config,
        format: cli.format,
        archive: cli.archive,
    };

    match cli.command {
        Commands::List => list::run(&ctx),
        Commands::Search { query, fuzzy } => search::run(&ctx, &query, fuzzy),
        Commands::Sections => sections::run(&ctx),
        Commands::Ports => ports::run(&ctx),
        Commands::Load {
            name,
            port,
            metrics,
        } => load::run(&ctx, &name, port.as_deref(), metrics),
        Commands::Send {
            file,
            port,
            metrics,
        } => send::run(&ctx, &file, port.as_deref(), metrics),
        Commands::Config => config::run(&ctx),
    }
}
