use merklebox_core::manifest::ResponseCode;
use merklebox_core::traits::transport::Transport;

use crate::transport::HttpTransport;

/// Print the folders a server publishes and the fingerprint of its signing key.
pub async fn run_list(server: &str) -> Result<(), Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(server)?;
    let listing = transport.list_folders().await?;

    if listing.code != ResponseCode::Success {
        return Err(format!("{server} could not list its folders").into());
    }

    let public_key = listing.decode_public_key()?;

    println!("Server: {server}");
    println!(
        "Signing key: RSA-{} (fingerprint {})",
        public_key.bits(),
        public_key.fingerprint()?
    );

    if listing.folder_list.is_empty() {
        println!("No folders published.");
        return Ok(());
    }

    println!("{} folder(s):", listing.folder_list.len());
    for folder in &listing.folder_list {
        println!("  {folder}");
    }

    Ok(())
}
