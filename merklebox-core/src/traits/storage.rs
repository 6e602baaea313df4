use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::MerkleBoxError;

/// Local destination for downloaded folders.
#[async_trait(?Send)]
pub trait DownloadStore {
    /// Create (or reuse) the directory that will hold `folder`.
    async fn prepare(&self, folder: &str) -> Result<PathBuf, MerkleBoxError>;

    /// Write one file of `folder` and return where it landed.
    async fn write(&self, folder: &str, file: &str, data: &[u8]) -> Result<PathBuf, MerkleBoxError>;
}

/// Reject names that would escape the folder directory: anything that is not
/// a single, normal path component.
pub fn validate_entry_name(name: &str) -> Result<(), MerkleBoxError> {
    let path = Path::new(name);
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && path.file_name().and_then(|n| n.to_str()) == Some(name);

    if is_plain {
        Ok(())
    } else {
        Err(MerkleBoxError::Storage(format!("refusing unsafe entry name {name:?}")))
    }
}
