use std::io::{self, BufRead, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use merklebox_core::sync::{DownloadedFolder, VerificationSession, VerifiedDownload};
use merklebox_core::traits::storage::DownloadStore;
use merklebox_core::traits::transport::Transport;

use crate::storage::LocalFs;
use crate::transport::HttpTransport;

/// Download a folder from the server and verify it against the signed root.
///
/// Prompts for the folder on stdin when none is given. With `tamper`, the
/// first downloaded file is modified before verification, which must then
/// fail with a root mismatch.
pub async fn run_fetch(
    server: &str,
    folder: Option<String>,
    dest: &Path,
    tamper: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(server)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .map_err(|e| format!("progress bar template error: {e}"))?
            .progress_chars("#>-"),
    );
    let store = LocalFs::new(dest).with_progress(pb.clone());

    let verified = fetch_folder(&transport, &store, folder, tamper, &pb).await?;

    println!("Verified folder {:?}", verified.folder);
    println!("  Merkle root: {}", hex::encode(verified.root));
    println!("  Files:       {}", verified.paths.len());
    println!("  Saved to:    {}", verified.directory.display());

    Ok(())
}

/// Run one verification session, with the interactive and tamper hooks the
/// CLI offers between the protocol steps.
pub(crate) async fn fetch_folder<T, S>(
    transport: &T,
    store: &S,
    folder: Option<String>,
    tamper: bool,
    pb: &ProgressBar,
) -> Result<VerifiedDownload, Box<dyn std::error::Error>>
where
    T: Transport + ?Sized,
    S: DownloadStore + ?Sized,
{
    let mut session = VerificationSession::new(transport, store);

    let listing = session.list().await?;
    let folder = match folder {
        Some(folder) => folder,
        None => prompt_folder(&listing.folders)?,
    };

    let manifest = session.fetch_manifest(&folder).await?;
    pb.set_length(manifest.files.len() as u64);

    let downloaded = session.download(manifest).await;
    pb.finish_and_clear();
    let downloaded = downloaded?;

    if tamper {
        tamper_first_file(&downloaded).await?;
    }

    Ok(session.verify(downloaded)?)
}

/// Ask on stdin which of `folders` to fetch.
fn prompt_folder(folders: &[String]) -> Result<String, Box<dyn std::error::Error>> {
    if folders.is_empty() {
        return Err("the server publishes no folders".into());
    }

    println!("Available folders:");
    for folder in folders {
        println!("  {folder}");
    }
    print!("Folder to fetch: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let choice = line.trim();
    if choice.is_empty() {
        return Err("no folder selected".into());
    }
    Ok(choice.to_string())
}

/// Append a newline to the first downloaded file.
async fn tamper_first_file(downloaded: &DownloadedFolder) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = downloaded.paths.first() else {
        return Ok(());
    };

    warn!(path = %path.display(), "tampering with downloaded file before verification");

    let mut file = tokio::fs::OpenOptions::new().append(true).open(path).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    info!(path = %path.display(), "appended newline");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use merklebox_core::crypto::KeyPair;
    use merklebox_core::error::MerkleBoxError;
    use merklebox_core::manifest::{FolderListResponse, MerkleResponse};
    use merklebox_core::sync::{AbortReason, SessionError};
    use merklebox_server::api::build_router;
    use merklebox_server::state::AppState;

    /// Serve `dir` on an ephemeral port and return the base URL.
    async fn spawn_server(dir: &Path) -> String {
        let keys = KeyPair::generate_with_bits(1024).unwrap();
        let state = Arc::new(AppState::new(dir, keys).unwrap());
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn published() -> TempDir {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("a.txt"), "alpha").unwrap();
        fs::write(docs.join("b.txt"), "bravo").unwrap();
        fs::write(docs.join("c.txt"), "charlie").unwrap();
        dir
    }

    fn abort_reason(error: &(dyn std::error::Error + 'static)) -> Option<AbortReason> {
        error.downcast_ref::<SessionError>().and_then(SessionError::reason)
    }

    /// Flips one bit of every signature the server sends.
    struct FlipSignature(HttpTransport);

    #[async_trait(?Send)]
    impl Transport for FlipSignature {
        async fn list_folders(&self) -> Result<FolderListResponse, MerkleBoxError> {
            self.0.list_folders().await
        }

        async fn fetch_manifest(&self, folder: &str) -> Result<MerkleResponse, MerkleBoxError> {
            let mut response = self.0.fetch_manifest(folder).await?;
            if let Some(byte) = response.merkle_sign.first_mut() {
                *byte ^= 0x01;
            }
            Ok(response)
        }

        async fn download_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, MerkleBoxError> {
            self.0.download_file(folder, file).await
        }
    }

    #[tokio::test]
    async fn test_fetch_verifies_over_http() {
        let served = published();
        let url = spawn_server(served.path()).await;
        let dest = TempDir::new().unwrap();

        let transport = HttpTransport::new(&url).unwrap();
        let store = LocalFs::new(dest.path());
        let verified = fetch_folder(&transport, &store, Some("docs".into()), false, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(verified.folder, "docs");
        assert_eq!(verified.paths.len(), 3);
        assert_eq!(
            fs::read(dest.path().join("docs").join("c.txt")).unwrap(),
            b"charlie"
        );
    }

    #[tokio::test]
    async fn test_tampered_download_is_root_mismatch() {
        let served = published();
        let url = spawn_server(served.path()).await;
        let dest = TempDir::new().unwrap();

        let transport = HttpTransport::new(&url).unwrap();
        let store = LocalFs::new(dest.path());
        let error = fetch_folder(&transport, &store, Some("docs".into()), true, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert_eq!(abort_reason(error.as_ref()), Some(AbortReason::RootMismatch));
        assert_eq!(
            fs::read(dest.path().join("docs").join("a.txt")).unwrap(),
            b"alpha\n"
        );
    }

    #[tokio::test]
    async fn test_flipped_signature_is_bad_signature() {
        let served = published();
        let url = spawn_server(served.path()).await;
        let dest = TempDir::new().unwrap();

        let transport = FlipSignature(HttpTransport::new(&url).unwrap());
        let store = LocalFs::new(dest.path());
        let error = fetch_folder(&transport, &store, Some("docs".into()), false, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert_eq!(abort_reason(error.as_ref()), Some(AbortReason::BadSignature));
    }

    #[tokio::test]
    async fn test_unknown_folder_is_not_found() {
        let served = published();
        let url = spawn_server(served.path()).await;
        let dest = TempDir::new().unwrap();

        let transport = HttpTransport::new(&url).unwrap();
        let store = LocalFs::new(dest.path());
        let error = fetch_folder(&transport, &store, Some("missing".into()), false, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert_eq!(abort_reason(error.as_ref()), Some(AbortReason::NotFound));
        assert!(!dest.path().join("missing").exists());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let dest = TempDir::new().unwrap();
        let transport = HttpTransport::new("http://127.0.0.1:1").unwrap();
        let store = LocalFs::new(dest.path());

        let error = fetch_folder(&transport, &store, Some("docs".into()), false, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert_eq!(abort_reason(error.as_ref()), Some(AbortReason::ServerUnreachable));
    }
}
