use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use merklebox_core::crypto::CryptoError;
use merklebox_core::merkle::MerkleError;

/// Server-level error type covering all subsystems.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Merkle tree error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        tracing::error!(status = %status, error = %self, "request failed");

        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias for server handler results.
pub type Result<T> = std::result::Result<T, ServerError>;
