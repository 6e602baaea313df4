//! SHA-256 Merkle tree over an ordered set of content sources.

pub mod hash;
pub mod substance;
pub mod tree;

pub use hash::Hash;
pub use substance::{BufferedContent, FileContent, Substance};
pub use tree::{MerkleTree, Node, NodeIndex};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleError {
    #[error("cannot construct tree with no content")]
    EmptyInput,
    #[error("failed to read content of {source_id}: {source}")]
    ContentRead {
        source_id: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MerkleError>;
