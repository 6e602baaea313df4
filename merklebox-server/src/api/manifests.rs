use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use merklebox_core::manifest::{MerkleResponse, SignedRoot};
use merklebox_core::merkle::{FileContent, MerkleTree};

use crate::catalog;
use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FolderQuery {
    pub file: Option<String>,
}

/// GET /getfile?file={folder}
///
/// Hash every file in the folder, build the Merkle tree and return the file
/// names with the signed root. Unknown folders get a `Code: "0"` body rather
/// than an HTTP error. Nothing is cached; each call reads the files again.
pub async fn get_folder_manifest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FolderQuery>,
) -> Result<Json<MerkleResponse>, ServerError> {
    let folder = match params.file {
        Some(name) if state.is_published(&name) => name,
        requested => {
            tracing::info!(?requested, "manifest requested for unpublished folder");
            return Ok(Json(MerkleResponse::not_found()));
        }
    };

    tracing::info!(folder = %folder, "calculating merkle tree");

    let task_state = Arc::clone(&state);
    let response = tokio::task::spawn_blocking(move || build_manifest(&task_state, &folder))
        .await
        .map_err(|e| ServerError::Internal(format!("manifest task failed: {e}")))??;

    Ok(Json(response))
}

/// Blocking half of [`get_folder_manifest`].
pub fn build_manifest(state: &AppState, folder: &str) -> Result<MerkleResponse, ServerError> {
    let folder_dir = state.directory.join(folder);
    let files = catalog::list_files(&folder_dir)?;

    let tree = MerkleTree::build(files.iter().map(|name| FileContent::new(folder_dir.join(name))))?;
    let signed = SignedRoot::sign(&state.keys, tree.root_hash())?;

    tracing::info!(
        folder,
        files = files.len(),
        root = %hex::encode(signed.root),
        "merkle root signed"
    );

    Ok(MerkleResponse::found(files, &signed))
}
