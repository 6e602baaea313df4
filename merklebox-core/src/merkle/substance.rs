use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::hash::{hash_bytes, hash_reader, Hash};
use super::{MerkleError, Result};

/// A content source the tree can commit to.
///
/// Implementors hash their content deterministically from their identity
/// alone, so the tree never deals with I/O directly.
pub trait Substance: Clone + fmt::Debug {
    /// SHA-256 of the full content.
    fn content_hash(&self) -> Result<Hash>;

    /// Whether `other` refers to the same source (not merely equal content).
    fn same_source(&self, other: &Self) -> bool;
}

/// A file on local disk, identified by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    path: PathBuf,
}

impl FileContent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Substance for FileContent {
    fn content_hash(&self) -> Result<Hash> {
        let read_error = |source| MerkleError::ContentRead {
            source_id: self.path.display().to_string(),
            source,
        };

        let file = File::open(&self.path).map_err(read_error)?;
        hash_reader(file).map_err(read_error)
    }

    fn same_source(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

/// In-memory content under a caller-chosen label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedContent {
    label: String,
    bytes: Vec<u8>,
}

impl BufferedContent {
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Substance for BufferedContent {
    fn content_hash(&self) -> Result<Hash> {
        Ok(hash_bytes(&self.bytes))
    }

    fn same_source(&self, other: &Self) -> bool {
        self.label == other.label
    }
}
