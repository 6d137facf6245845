//! Zip archives holding snapshot files.

use crate::error::{Result, SnapshotError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// Entry suffixes treated as snapshots when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".z80"];

/// A snapshot ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Entry or file name
    pub name: String,
    /// Raw snapshot bytes
    pub data: Vec<u8>,
}

/// An open snapshot archive.
pub struct SnapshotArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
    extensions: Vec<String>,
}

impl std::fmt::Debug for SnapshotArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotArchive")
            .field("path", &self.path)
            .field("entries", &self.zip.len())
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl SnapshotArchive {
    /// Open an archive, recognising the default snapshot extensions.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SnapshotError::ArchiveNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|source| {
            SnapshotError::InvalidArchive {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), entries = zip.len(), "Opened snapshot archive");

        Ok(Self {
            path: path.to_path_buf(),
            zip,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        })
    }

    /// Recognise these suffixes instead of the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all snapshot entries, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .zip
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter(|name| has_extension(name, &self.extensions))
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    /// Read the full contents of one entry.
    pub fn read(&mut self, name: &str) -> Result<Snapshot> {
        let mut entry = self.zip.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => SnapshotError::EntryNotFound(name.to_string()),
            ZipError::Io(io) => SnapshotError::Io(io),
            source => SnapshotError::InvalidArchive {
                path: self.path.clone(),
                source,
            },
        })?;

        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut data)?;
        tracing::debug!(name, bytes = data.len(), "Read snapshot from archive");

        Ok(Snapshot {
            name: name.to_string(),
            data,
        })
    }
}

/// Read a loose snapshot file from disk.
pub fn read_file(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Snapshot { name, data })
}

/// Whether `name` ends with any of `extensions`, ignoring ASCII case.
pub fn has_extension<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    let name = name.as_bytes();
    extensions.iter().any(|ext| {
        let ext = ext.as_ref().as_bytes();
        name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
    })
}
