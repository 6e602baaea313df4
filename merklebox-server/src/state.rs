use std::path::PathBuf;

use merklebox_core::crypto::KeyPair;

use crate::catalog;
use crate::error::Result;

/// Shared application state passed to all handlers via Axum's State extractor.
///
/// Built once at startup and never mutated, so handlers read it without locking.
#[derive(Debug)]
pub struct AppState {
    /// Directory whose subfolders are published.
    pub directory: PathBuf,
    /// Subfolder names captured at startup. Not refreshed while running.
    pub folders: Vec<String>,
    /// Process-wide RSA signing key pair.
    pub keys: KeyPair,
}

impl AppState {
    /// Snapshot the subfolders of `directory` and take ownership of `keys`.
    pub fn new(directory: impl Into<PathBuf>, keys: KeyPair) -> Result<Self> {
        let directory = directory.into();
        let folders = catalog::list_folders(&directory)?;

        Ok(Self {
            directory,
            folders,
            keys,
        })
    }

    /// Whether `folder` is one of the names captured at startup.
    pub fn is_published(&self, folder: &str) -> bool {
        self.folders.iter().any(|name| name == folder)
    }
}
