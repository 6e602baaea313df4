//! Client-side verification: rebuild the tree over downloaded files and check
//! it against the signed root the server published.

pub mod verifier;
pub mod session;

pub use session::{
    AbortReason, DownloadedFolder, FolderManifest, Listing, SessionState, VerificationSession,
    VerifiedDownload,
};

use thiserror::Error;

use crate::error::MerkleBoxError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session aborted ({reason}): {source}")]
    Aborted {
        reason: AbortReason,
        #[source]
        source: MerkleBoxError,
    },
    #[error("cannot {action} while the session is in state {state}")]
    OutOfOrder {
        action: &'static str,
        state: SessionState,
    },
}

impl SessionError {
    /// The terminal abort reason, if the session was aborted.
    pub fn reason(&self) -> Option<AbortReason> {
        match self {
            SessionError::Aborted { reason, .. } => Some(*reason),
            SessionError::OutOfOrder { .. } => None,
        }
    }
}
