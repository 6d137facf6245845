//! Error types for the snapshots crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors that can occur while reading snapshot archives.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Archive file does not exist
    #[error("Snapshot archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// Archive exists but is not a readable zip
    #[error("Invalid snapshot archive {}: {source}", path.display())]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// No entry with that name
    #[error("Snapshot not found in archive: {0}")]
    EntryNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
