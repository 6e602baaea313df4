use serde::{Deserialize, Serialize};

use super::serialization::hex_bytes;
use super::signed_root::SignedRoot;
use crate::crypto::{CryptoError, PublicKey};
use crate::error::MerkleBoxError;
use crate::merkle::Hash;

/// `Code` field of every response: `"1"` on success, `"0"` on failure or not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    #[serde(rename = "0")]
    Failure,
    #[serde(rename = "1")]
    Success,
}

/// Body of `GET /getfilelist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderListResponse {
    pub code: ResponseCode,
    #[serde(default)]
    pub folder_list: Vec<String>,
    #[serde(default)]
    pub public_key: String,
}

impl FolderListResponse {
    pub fn success(folders: Vec<String>, public_key: &PublicKey) -> Result<Self, CryptoError> {
        Ok(Self {
            code: ResponseCode::Success,
            folder_list: folders,
            public_key: public_key.to_hex()?,
        })
    }

    pub fn decode_public_key(&self) -> Result<PublicKey, MerkleBoxError> {
        PublicKey::from_hex(&self.public_key)
            .map_err(|e| MerkleBoxError::MalformedResponse(format!("public key: {e}")))
    }
}

/// Body of `GET /getfile?file=<folder>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MerkleResponse {
    pub code: ResponseCode,
    #[serde(default)]
    pub file_list: Vec<String>,
    #[serde(default, with = "hex_bytes")]
    pub merkle_root: Vec<u8>,
    #[serde(default, with = "hex_bytes")]
    pub merkle_sign: Vec<u8>,
}

impl MerkleResponse {
    pub fn found(files: Vec<String>, signed: &SignedRoot) -> Self {
        Self {
            code: ResponseCode::Success,
            file_list: files,
            merkle_root: signed.root.to_vec(),
            merkle_sign: signed.signature.clone(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            code: ResponseCode::Failure,
            file_list: Vec::new(),
            merkle_root: Vec::new(),
            merkle_sign: Vec::new(),
        }
    }

    /// The claimed root and its signature. The root must be exactly one digest long.
    pub fn signed_root(&self) -> Result<SignedRoot, MerkleBoxError> {
        let root: Hash = self.merkle_root.as_slice().try_into().map_err(|_| {
            MerkleBoxError::MalformedResponse(format!(
                "merkle root is {} bytes, expected {}",
                self.merkle_root.len(),
                std::mem::size_of::<Hash>()
            ))
        })?;

        Ok(SignedRoot {
            root,
            signature: self.merkle_sign.clone(),
        })
    }
}
