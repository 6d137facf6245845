//! Standard locations for configuration and the snapshot archive

use std::path::{Path, PathBuf};

/// Directory name used under the platform config/data directories
pub const APP_DIR: &str = "picoface";

/// Archive file name looked for in the standard locations
pub const ARCHIVE_NAME: &str = "snaps.zip";

/// Configuration files, in search order
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(".picoface.toml"),
        PathBuf::from("picoface.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(APP_DIR).join("config.toml"));
    }
    candidates
}

/// Snapshot archives, in search order
pub fn archive_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(ARCHIVE_NAME),
        Path::new("snaps").join(ARCHIVE_NAME),
    ];
    if let Some(dir) = dirs::data_dir() {
        candidates.push(dir.join(APP_DIR).join("snaps").join(ARCHIVE_NAME));
    }
    candidates
}

/// Resolve the archive to use
///
/// An explicit path (command line) wins over the configured one, which wins
/// over the first existing standard location. Explicit and configured paths
/// are returned even if missing so the caller reports the right file.
pub fn resolve_archive(explicit: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit.or(configured) {
        return Some(path.to_path_buf());
    }
    archive_candidates().into_iter().find(|p| p.is_file())
}
