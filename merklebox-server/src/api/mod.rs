pub mod folders;
pub mod manifests;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use merklebox_core::constants::{ROUTE_FOLDER_LIST, ROUTE_FOLDER_MANIFEST, STATIC_SEGMENT};

use crate::state::AppState;

/// Build the Axum router: the two JSON endpoints, the static file tree,
/// a health check, CORS and tracing middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.directory);

    Router::new()
        .route(ROUTE_FOLDER_LIST, get(folders::get_folder_list))
        .route(ROUTE_FOLDER_MANIFEST, get(manifests::get_folder_manifest))
        .nest_service(&format!("/{STATIC_SEGMENT}"), static_files)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Simple health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use merklebox_core::crypto::KeyPair;
    use merklebox_core::manifest::serialization::from_json;
    use merklebox_core::manifest::{FolderListResponse, MerkleResponse, ResponseCode};
    use merklebox_core::merkle::{BufferedContent, MerkleTree};

    struct Fixture {
        dir: TempDir,
        router: Router,
        state: Arc<AppState>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("b.txt"), "world").unwrap();
        fs::write(docs.join("a.txt"), "hello").unwrap();
        fs::create_dir(docs.join("nested")).unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("readme.txt"), "not a folder").unwrap();

        let keys = KeyPair::generate_with_bits(1024).unwrap();
        let state = Arc::new(AppState::new(dir.path(), keys).unwrap());
        let router = build_router(Arc::clone(&state));

        Fixture { dir, router, state }
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_folder_list_and_public_key() {
        let fx = fixture();
        let (status, body) = get(&fx.router, "/getfilelist").await;
        assert_eq!(status, StatusCode::OK);

        let listing: FolderListResponse = from_json(&body).unwrap();
        assert_eq!(listing.code, ResponseCode::Success);
        assert_eq!(listing.folder_list, vec!["docs", "empty"]);
        assert_eq!(&listing.decode_public_key().unwrap(), fx.state.keys.public_key());
    }

    #[tokio::test]
    async fn test_folder_list_wire_field_names() {
        let fx = fixture();
        let (_, body) = get(&fx.router, "/getfilelist").await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["Code"], "1");
        assert!(value["FolderList"].is_array());
        assert!(value["PublicKey"].is_string());
    }

    #[tokio::test]
    async fn test_manifest_for_published_folder() {
        let fx = fixture();
        let (status, body) = get(&fx.router, "/getfile?file=docs").await;
        assert_eq!(status, StatusCode::OK);

        let manifest: MerkleResponse = from_json(&body).unwrap();
        assert_eq!(manifest.code, ResponseCode::Success);
        assert_eq!(manifest.file_list, vec!["a.txt", "b.txt"]);

        let expected = MerkleTree::build(vec![
            BufferedContent::new("a.txt", "hello"),
            BufferedContent::new("b.txt", "world"),
        ])
        .unwrap();
        let signed = manifest.signed_root().unwrap();
        assert_eq!(signed.root, expected.root_hash());
        assert!(signed.verify(fx.state.keys.public_key()));
    }

    #[tokio::test]
    async fn test_manifest_is_recomputed_per_request() {
        let fx = fixture();
        let (_, before) = get(&fx.router, "/getfile?file=docs").await;
        fs::write(fx.dir.path().join("docs").join("a.txt"), "changed").unwrap();
        let (_, after) = get(&fx.router, "/getfile?file=docs").await;

        let before: MerkleResponse = from_json(&before).unwrap();
        let after: MerkleResponse = from_json(&after).unwrap();
        assert_ne!(before.merkle_root, after.merkle_root);
    }

    #[tokio::test]
    async fn test_manifest_for_unknown_folder() {
        let fx = fixture();
        for uri in [
            "/getfile?file=missing",
            "/getfile?file=readme.txt",
            "/getfile?file=..",
            "/getfile",
        ] {
            let (status, body) = get(&fx.router, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");

            let manifest: MerkleResponse = from_json(&body).unwrap();
            assert_eq!(manifest.code, ResponseCode::Failure, "{uri}");
            assert!(manifest.file_list.is_empty());
            assert!(manifest.merkle_root.is_empty());
        }
    }

    #[tokio::test]
    async fn test_folders_added_after_startup_are_not_published() {
        let fx = fixture();
        let late = fx.dir.path().join("late");
        fs::create_dir(&late).unwrap();
        fs::write(late.join("x.txt"), "x").unwrap();

        let (_, body) = get(&fx.router, "/getfilelist").await;
        let listing: FolderListResponse = from_json(&body).unwrap();
        assert!(!listing.folder_list.contains(&"late".to_string()));

        let (_, body) = get(&fx.router, "/getfile?file=late").await;
        let manifest: MerkleResponse = from_json(&body).unwrap();
        assert_eq!(manifest.code, ResponseCode::Failure);
    }

    #[tokio::test]
    async fn test_empty_folder_fails_without_stopping_server() {
        let fx = fixture();
        let (status, body) = get(&fx.router, "/getfile?file=empty").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].is_string());

        let (status, _) = get(&fx.router, "/getfile?file=docs").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_file_download() {
        let fx = fixture();
        let (status, body) = get(&fx.router, "/MerkleFiles/docs/a.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"hello");

        let (status, _) = get(&fx.router, "/MerkleFiles/docs/missing.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_check() {
        let fx = fixture();
        let (status, body) = get(&fx.router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
