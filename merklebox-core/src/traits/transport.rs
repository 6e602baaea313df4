use async_trait::async_trait;

use crate::error::MerkleBoxError;
use crate::manifest::{FolderListResponse, MerkleResponse};

/// Client side of the distribution protocol.
///
/// Unreachable servers and non-success statuses are reported as
/// [`MerkleBoxError::Transport`]; undecodable bodies as
/// [`MerkleBoxError::MalformedResponse`].
#[async_trait(?Send)]
pub trait Transport {
    async fn list_folders(&self) -> Result<FolderListResponse, MerkleBoxError>;
    async fn fetch_manifest(&self, folder: &str) -> Result<MerkleResponse, MerkleBoxError>;
    async fn download_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, MerkleBoxError>;
}
