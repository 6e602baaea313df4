use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleBoxError {
    #[error("Merkle tree error: {0}")]
    Merkle(#[from] crate::merkle::MerkleError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Integrity error: expected root {expected}, rebuilt {actual}")]
    Integrity { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, MerkleBoxError>;
