use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::verifier::{authenticate, check_integrity, rebuild_root};
use super::SessionError;
use crate::crypto::PublicKey;
use crate::error::MerkleBoxError;
use crate::manifest::{ResponseCode, SignedRoot};
use crate::merkle::Hash;
use crate::traits::storage::{validate_entry_name, DownloadStore};
use crate::traits::transport::Transport;

/// Why a session ended without verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ServerUnreachable,
    MalformedResponse,
    NotFound,
    DownloadFailed,
    RebuildFailed,
    BadSignature,
    RootMismatch,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AbortReason::ServerUnreachable => "server unreachable",
            AbortReason::MalformedResponse => "malformed response",
            AbortReason::NotFound => "folder not found",
            AbortReason::DownloadFailed => "download failed",
            AbortReason::RebuildFailed => "local rebuild failed",
            AbortReason::BadSignature => "bad signature",
            AbortReason::RootMismatch => "root mismatch",
        };
        f.write_str(name)
    }
}

/// Position in the verification protocol. `Verified` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Listing,
    Selection,
    ManifestFetch,
    Download,
    LocalRebuild,
    Authentication,
    Integrity,
    Verified,
    Aborted(AbortReason),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Verified | SessionState::Aborted(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Listing => f.write_str("listing"),
            SessionState::Selection => f.write_str("selection"),
            SessionState::ManifestFetch => f.write_str("manifest fetch"),
            SessionState::Download => f.write_str("download"),
            SessionState::LocalRebuild => f.write_str("local rebuild"),
            SessionState::Authentication => f.write_str("authentication"),
            SessionState::Integrity => f.write_str("integrity"),
            SessionState::Verified => f.write_str("verified"),
            SessionState::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}

/// Folders on offer and the key their roots are signed with.
#[derive(Debug, Clone)]
pub struct Listing {
    pub folders: Vec<String>,
    pub public_key: PublicKey,
}

/// The server's claim about one folder.
#[derive(Debug, Clone)]
pub struct FolderManifest {
    pub folder: String,
    pub files: Vec<String>,
    pub signed_root: SignedRoot,
}

/// A folder whose files are all on local storage, not yet checked.
#[derive(Debug, Clone)]
pub struct DownloadedFolder {
    pub manifest: FolderManifest,
    pub directory: PathBuf,
    /// Local paths, in manifest order.
    pub paths: Vec<PathBuf>,
}

/// A folder whose local content matches the signed root.
#[derive(Debug, Clone)]
pub struct VerifiedDownload {
    pub folder: String,
    pub root: Hash,
    pub directory: PathBuf,
    pub paths: Vec<PathBuf>,
}

/// One pass through the verification protocol for a single folder.
///
/// Steps must be called in order: [`list`](Self::list),
/// [`fetch_manifest`](Self::fetch_manifest), [`download`](Self::download),
/// [`verify`](Self::verify). The first failure aborts the session for good;
/// start a new session to try again.
pub struct VerificationSession<'a, T: ?Sized, S: ?Sized> {
    transport: &'a T,
    store: &'a S,
    state: SessionState,
    history: Vec<SessionState>,
    public_key: Option<PublicKey>,
}

impl<'a, T, S> VerificationSession<'a, T, S>
where
    T: Transport + ?Sized,
    S: DownloadStore + ?Sized,
{
    pub fn new(transport: &'a T, store: &'a S) -> Self {
        Self {
            transport,
            store,
            state: SessionState::Listing,
            history: vec![SessionState::Listing],
            public_key: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state the session has entered, in order.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Fetch the folder listing and the server public key.
    pub async fn list(&mut self) -> Result<Listing, SessionError> {
        self.expect_state(SessionState::Listing, "list folders")?;
        let transport = self.transport;

        let response = match transport.list_folders().await {
            Ok(response) => response,
            Err(e) => return Err(self.abort(response_failure(&e), e)),
        };

        if response.code != ResponseCode::Success {
            let error = MerkleBoxError::Transport("server returned no folder listing".to_string());
            return Err(self.abort(AbortReason::ServerUnreachable, error));
        }

        let public_key = match response.decode_public_key() {
            Ok(key) => key,
            Err(e) => return Err(self.abort(AbortReason::MalformedResponse, e)),
        };

        info!(folders = response.folder_list.len(), "folder listing received");
        self.public_key = Some(public_key.clone());
        self.advance(SessionState::Selection);

        Ok(Listing {
            folders: response.folder_list,
            public_key,
        })
    }

    /// Request the file list and signed root of the selected folder.
    pub async fn fetch_manifest(&mut self, folder: &str) -> Result<FolderManifest, SessionError> {
        self.expect_state(SessionState::Selection, "fetch a manifest")?;
        let transport = self.transport;

        info!(folder, "folder selected");
        self.advance(SessionState::ManifestFetch);

        let response = match transport.fetch_manifest(folder).await {
            Ok(response) => response,
            Err(e) => return Err(self.abort(response_failure(&e), e)),
        };

        if response.code != ResponseCode::Success {
            let error = MerkleBoxError::NotFound(format!("folder {folder:?}"));
            return Err(self.abort(AbortReason::NotFound, error));
        }

        let signed_root = match response.signed_root() {
            Ok(signed_root) => signed_root,
            Err(e) => return Err(self.abort(AbortReason::MalformedResponse, e)),
        };

        info!(
            folder,
            files = response.file_list.len(),
            root = %hex::encode(signed_root.root),
            "manifest received"
        );
        self.advance(SessionState::Download);

        Ok(FolderManifest {
            folder: folder.to_string(),
            files: response.file_list,
            signed_root,
        })
    }

    /// Download every listed file, one at a time. Any failure is fatal.
    pub async fn download(&mut self, manifest: FolderManifest) -> Result<DownloadedFolder, SessionError> {
        self.expect_state(SessionState::Download, "download files")?;
        let transport = self.transport;
        let store = self.store;

        let names = std::iter::once(&manifest.folder).chain(&manifest.files);
        for name in names {
            if let Err(e) = validate_entry_name(name) {
                return Err(self.abort(AbortReason::DownloadFailed, e));
            }
        }

        let directory = match store.prepare(&manifest.folder).await {
            Ok(directory) => directory,
            Err(e) => return Err(self.abort(AbortReason::DownloadFailed, e)),
        };

        let mut paths = Vec::with_capacity(manifest.files.len());
        for file in &manifest.files {
            let data = match transport.download_file(&manifest.folder, file).await {
                Ok(data) => data,
                Err(e) => return Err(self.abort(AbortReason::DownloadFailed, e)),
            };

            let path = match store.write(&manifest.folder, file, &data).await {
                Ok(path) => path,
                Err(e) => return Err(self.abort(AbortReason::DownloadFailed, e)),
            };

            debug!(file = %file, bytes = data.len(), "file downloaded");
            paths.push(path);
        }

        info!(folder = %manifest.folder, files = paths.len(), "download complete");
        self.advance(SessionState::LocalRebuild);

        Ok(DownloadedFolder {
            manifest,
            directory,
            paths,
        })
    }

    /// Rebuild the tree locally, check the signature, then compare roots.
    pub fn verify(&mut self, downloaded: DownloadedFolder) -> Result<VerifiedDownload, SessionError> {
        self.expect_state(SessionState::LocalRebuild, "verify a download")?;

        let local_root = match rebuild_root(&downloaded.paths) {
            Ok(root) => root,
            Err(e) => return Err(self.abort(AbortReason::RebuildFailed, e.into())),
        };
        debug!(root = %hex::encode(local_root), "local tree rebuilt");
        self.advance(SessionState::Authentication);

        let public_key = match self.public_key.clone() {
            Some(key) => key,
            None => {
                let error = MerkleBoxError::Authentication("no server public key".to_string());
                return Err(self.abort(AbortReason::BadSignature, error));
            }
        };

        let signed_root = &downloaded.manifest.signed_root;
        if let Err(e) = authenticate(&public_key, signed_root) {
            return Err(self.abort(AbortReason::BadSignature, e));
        }
        self.advance(SessionState::Integrity);

        if let Err(e) = check_integrity(signed_root, &local_root) {
            return Err(self.abort(AbortReason::RootMismatch, e));
        }
        self.advance(SessionState::Verified);

        info!(
            folder = %downloaded.manifest.folder,
            root = %hex::encode(local_root),
            "download verified"
        );

        Ok(VerifiedDownload {
            folder: downloaded.manifest.folder,
            root: local_root,
            directory: downloaded.directory,
            paths: downloaded.paths,
        })
    }

    /// Run the whole protocol for `folder`.
    pub async fn run(&mut self, folder: &str) -> Result<VerifiedDownload, SessionError> {
        self.list().await?;
        let manifest = self.fetch_manifest(folder).await?;
        let downloaded = self.download(manifest).await?;
        self.verify(downloaded)
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::OutOfOrder {
                action,
                state: self.state,
            })
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "session transition");
        self.state = next;
        self.history.push(next);
    }

    fn abort(&mut self, reason: AbortReason, source: MerkleBoxError) -> SessionError {
        warn!(%reason, error = %source, "session aborted");
        self.advance(SessionState::Aborted(reason));
        SessionError::Aborted { reason, source }
    }
}

/// Listing and manifest failures: undecodable bodies are malformed, anything
/// else means the server could not be reached or did not answer properly.
fn response_failure(error: &MerkleBoxError) -> AbortReason {
    match error {
        MerkleBoxError::MalformedResponse(_) => AbortReason::MalformedResponse,
        _ => AbortReason::ServerUnreachable,
    }
}
