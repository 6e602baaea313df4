use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use merklebox_core::manifest::FolderListResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// GET /getfilelist
///
/// The folder names captured at startup, plus the server's public key
/// (hex of its SubjectPublicKeyInfo DER).
pub async fn get_folder_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FolderListResponse>, ServerError> {
    let response = FolderListResponse::success(state.folders.clone(), state.keys.public_key())?;

    tracing::info!(folders = state.folders.len(), "folder list served");

    Ok(Json(response))
}
