use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use merklebox_core::constants::{QUERY_FOLDER, ROUTE_FOLDER_LIST, ROUTE_FOLDER_MANIFEST, STATIC_SEGMENT};
use merklebox_core::error::MerkleBoxError;
use merklebox_core::manifest::serialization::from_json;
use merklebox_core::manifest::{FolderListResponse, MerkleResponse};
use merklebox_core::traits::transport::Transport;

/// HTTP transport for a MerkleBox server.
///
/// Requests are plain GETs:
/// ```text
/// GET {base}/getfilelist
/// GET {base}/getfile?file={folder}
/// GET {base}/MerkleFiles/{folder}/{file}
/// ```
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport for the server at `server` (e.g. `http://localhost:8100`).
    pub fn new(server: &str) -> Result<Self, MerkleBoxError> {
        let base = Url::parse(server)
            .map_err(|e| MerkleBoxError::Transport(format!("invalid server URL {server:?}: {e}")))?;

        if base.cannot_be_a_base() {
            return Err(MerkleBoxError::Transport(format!(
                "server URL {server:?} cannot carry a path"
            )));
        }

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MerkleBoxError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MerkleBoxError::Transport(format!("server URL {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, MerkleBoxError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MerkleBoxError::Transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MerkleBoxError::Transport(format!("{url} returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MerkleBoxError::Transport(format!("reading {url} failed: {e}")))?;

        debug!(%url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

fn route_segment(route: &str) -> &str {
    route.trim_start_matches('/')
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn list_folders(&self) -> Result<FolderListResponse, MerkleBoxError> {
        let url = self.endpoint(&[route_segment(ROUTE_FOLDER_LIST)])?;
        let body = self.get(url).await?;
        from_json(&body)
    }

    async fn fetch_manifest(&self, folder: &str) -> Result<MerkleResponse, MerkleBoxError> {
        let mut url = self.endpoint(&[route_segment(ROUTE_FOLDER_MANIFEST)])?;
        url.query_pairs_mut().append_pair(QUERY_FOLDER, folder);
        let body = self.get(url).await?;
        from_json(&body)
    }

    async fn download_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, MerkleBoxError> {
        let url = self.endpoint(&[STATIC_SEGMENT, folder, file])?;
        self.get(url).await
    }
}
