use crate::crypto::{CryptoError, KeyPair, PublicKey};
use crate::merkle::Hash;

/// A Merkle root together with the server's signature over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRoot {
    pub root: Hash,
    pub signature: Vec<u8>,
}

impl SignedRoot {
    pub fn sign(keys: &KeyPair, root: Hash) -> Result<Self, CryptoError> {
        let signature = keys.sign_root(&root)?;
        Ok(Self { root, signature })
    }

    /// Whether the signature over `root` was made by the holder of `public_key`.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        public_key.verify_root(&self.root, &self.signature)
    }
}
