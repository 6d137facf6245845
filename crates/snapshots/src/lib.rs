//! Snapshot catalogue for the picoFace loader.
//!
//! This crate provides:
//! - Listing and reading `.z80` snapshots stored in a zip archive
//! - Type-ahead prefix filtering and relevance-ranked search
//! - An alphabetical section index over the sorted catalogue

mod archive;
mod error;
mod filter;
mod index;
mod relevance;

pub use archive::{DEFAULT_EXTENSIONS, Snapshot, SnapshotArchive, has_extension, read_file};
pub use error::{Result, SnapshotError};
pub use filter::filter_prefix;
pub use index::{Section, SectionIndex};
pub use relevance::{RelevanceScore, SearchHit, calculate_relevance, fuzzy_match, search};

/// Sorted snapshot names with their section index.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    names: Vec<String>,
    index: SectionIndex,
}

impl Catalogue {
    /// Build a catalogue; names are sorted first.
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        let index = SectionIndex::build(&names);
        Self { names, index }
    }

    /// Catalogue of every snapshot in an archive.
    pub fn from_archive(archive: &SnapshotArchive) -> Self {
        Self::new(archive.names())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index(&self) -> &SectionIndex {
        &self.index
    }

    /// Names matching a type-ahead query.
    pub fn filter(&self, query: &str) -> Vec<&str> {
        filter_prefix(&self.names, query)
    }

    /// Names ranked by relevance to `query`.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        search(&self.names, query)
    }
}
