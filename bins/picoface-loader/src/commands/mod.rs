//! CLI command implementations

pub mod config;
pub mod list;
pub mod load;
pub mod ports;
pub mod search;
pub mod sections;
pub mod send;

use picoface_cli::OutputFormat;
use picoface_core::config::Config;
use picoface_core::{Error, Result, paths};
use picoface_snapshots::{Catalogue, SnapshotArchive};
use std::path::PathBuf;

/// State shared by every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    /// `--archive` from the command line
    pub archive: Option<PathBuf>,
}

impl Context {
    /// Archive chosen by flag, config, or discovery
    pub fn archive_path(&self) -> Option<PathBuf> {
        paths::resolve_archive(
            self.archive.as_deref(),
            self.config.schema.library.archive.as_deref(),
        )
    }

    /// Open the archive, failing if none can be found
    pub fn open_archive(&self) -> Result<SnapshotArchive> {
        let path = self.archive_path().ok_or_else(Error::archive_not_found)?;
        let archive = SnapshotArchive::open(&path)?
            .with_extensions(self.config.schema.library.extensions.iter().cloned());
        tracing::debug!(path = %path.display(), "Opened snapshot archive");
        Ok(archive)
    }

    /// Catalogue of the archive; empty when no archive is discovered
    pub fn catalogue(&self) -> Result<Catalogue> {
        match self.archive_path() {
            Some(_) => Ok(Catalogue::from_archive(&self.open_archive()?)),
            None => {
                tracing::info!("No snapshot archive found; catalogue is empty");
                Ok(Catalogue::default())
            }
        }
    }
}
