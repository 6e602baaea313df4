use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use merklebox_core::crypto::KeyPair;
use merklebox_server::api;
use merklebox_server::config::Config;
use merklebox_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("merklebox_server=info,merklebox_core=info,tower_http=info")
        }))
        .init();

    tracing::info!("MerkleBox Server starting...");

    // Load .env file if present (non-fatal if missing).
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("no .env file loaded: {e}");
    }

    let config = Config::from_env();
    tracing::info!(
        port = config.port,
        directory = %config.directory.display(),
        "configuration loaded"
    );

    // One key pair per process; clients learn it from the folder listing.
    let keys = match KeyPair::generate() {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate server RSA key pair");
            std::process::exit(1);
        }
    };
    match keys.public_key().fingerprint() {
        Ok(fingerprint) => tracing::info!(
            bits = keys.public_key().bits(),
            %fingerprint,
            "server RSA key pair generated"
        ),
        Err(e) => tracing::warn!(error = %e, "could not fingerprint server public key"),
    }

    let state = match AppState::new(&config.directory, keys) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(
                error = %e,
                directory = %config.directory.display(),
                "failed to read published directory"
            );
            std::process::exit(1);
        }
    };
    tracing::info!(folders = ?state.folders, "published folders captured");

    let router = api::build_router(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind HTTP listener");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "MerkleBox Server running");

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "Axum server error");
        std::process::exit(1);
    }
}
