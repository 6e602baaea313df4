pub mod keys;
pub mod pss;

pub use keys::{KeyPair, PublicKey};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("RSA key generation failed: {0}")]
    KeyGeneration(String),
    #[error("RSA-PSS signing failed: {0}")]
    Sign(String),
    #[error("RSA-PSS verification failed: {0}")]
    Verify(String),
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),
    #[error("Public key encoding failed: {0}")]
    PublicKeyEncode(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
