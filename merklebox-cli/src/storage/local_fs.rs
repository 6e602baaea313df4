use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indicatif::ProgressBar;
use tokio::fs;
use tracing::debug;

use merklebox_core::error::MerkleBoxError;
use merklebox_core::traits::storage::{validate_entry_name, DownloadStore};

/// Download storage backed by the local filesystem.
///
/// Files land at `{root}/{folder}/{file}`. Existing files are overwritten.
pub struct LocalFs {
    root: PathBuf,
    progress: Option<ProgressBar>,
}

impl LocalFs {
    /// Create a new LocalFs rooted at the given download directory.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            progress: None,
        }
    }

    /// Advance `progress` by one for every file written.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn folder_dir(&self, folder: &str) -> Result<PathBuf, MerkleBoxError> {
        validate_entry_name(folder)?;
        Ok(self.root.join(folder))
    }
}

#[async_trait(?Send)]
impl DownloadStore for LocalFs {
    async fn prepare(&self, folder: &str) -> Result<PathBuf, MerkleBoxError> {
        let dir = self.folder_dir(folder)?;

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| MerkleBoxError::Storage(format!("create {} failed: {e}", dir.display())))?;

        debug!(dir = %dir.display(), "download directory ready");
        Ok(dir)
    }

    async fn write(&self, folder: &str, file: &str, data: &[u8]) -> Result<PathBuf, MerkleBoxError> {
        validate_entry_name(file)?;
        let path = self.folder_dir(folder)?.join(file);

        fs::write(&path, data)
            .await
            .map_err(|e| MerkleBoxError::Storage(format!("write {} failed: {e}", path.display())))?;

        if let Some(progress) = &self.progress {
            progress.set_message(file.to_string());
            progress.inc(1);
        }

        debug!(path = %path.display(), bytes = data.len(), "file stored");
        Ok(path)
    }
}
