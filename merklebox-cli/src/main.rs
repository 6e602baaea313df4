mod commands;
mod storage;
mod transport;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use merklebox_core::constants::{DEFAULT_DOWNLOAD_DIR, DEFAULT_SERVER_URL};

#[derive(Parser)]
#[command(name = "merklebox", about = "Download folders and verify their signed Merkle root")]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the folders the server publishes
    List,

    /// Download a folder and verify it against the server's signed root
    Fetch {
        /// Folder to fetch. If omitted, you are asked to pick one.
        folder: Option<String>,

        /// Directory downloads are written under
        #[arg(long, default_value = DEFAULT_DOWNLOAD_DIR)]
        dest: PathBuf,

        /// Append a newline to the first downloaded file before verifying
        #[arg(long, short)]
        tamper: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing (controlled by RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => commands::list::run_list(&cli.server).await,
        Commands::Fetch {
            folder,
            dest,
            tamper,
        } => commands::fetch::run_fetch(&cli.server, folder, &dest, tamper).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
