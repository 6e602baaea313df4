use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::debug;

use super::pss::{pss_sign, pss_verify};
use super::{CryptoError, Result};
use crate::constants::{FINGERPRINT_LEN, RSA_KEY_BITS};
use crate::merkle::hash::{hash_bytes, Hash};

/// The server's signing key pair. Generated once per process and never persisted.
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair with an [`RSA_KEY_BITS`] modulus.
    pub fn generate() -> Result<Self> {
        Self::generate_with_bits(RSA_KEY_BITS)
    }

    /// Generate a key pair with a caller-chosen modulus size.
    pub fn generate_with_bits(bits: usize) -> Result<Self> {
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public_key = PublicKey(RsaPublicKey::from(&private_key));

        Ok(Self {
            private_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Sign a Merkle root with RSASSA-PSS (SHA-256, random salt).
    pub fn sign_root(&self, root: &Hash) -> Result<Vec<u8>> {
        pss_sign(self.private_key(), root)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.public_key.bits())
            .finish_non_exhaustive()
    }
}

/// The public half of a [`KeyPair`], as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Check a root signature. Any failure (bad encoding, wrong key,
    /// wrong digest, scheme rejection) is reported as `false`.
    pub fn verify_root(&self, root: &[u8], signature: &[u8]) -> bool {
        match pss_verify(self.as_rsa(), root, signature) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "root signature rejected");
                false
            }
        }
    }

    /// SubjectPublicKeyInfo DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.0
            .to_public_key_der()
            .map(|document| document.as_bytes().to_vec())
            .map_err(|e| CryptoError::PublicKeyEncode(e.to_string()))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        RsaPublicKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Wire form: lowercase hex of the DER encoding.
    pub fn to_hex(&self) -> Result<String> {
        self.to_der().map(hex::encode)
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        let der = hex::decode(encoded)
            .map_err(|e| CryptoError::InvalidPublicKey(format!("invalid hex: {e}")))?;
        Self::from_der(&der)
    }

    /// Short hex digest of the DER encoding, for display.
    pub fn fingerprint(&self) -> Result<String> {
        let digest = hash_bytes(&self.to_der()?);
        Ok(hex::encode(&digest[..FINGERPRINT_LEN]))
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

/// Small keys shared across tests; full-size generation is too slow to repeat.
#[cfg(test)]
pub(crate) fn test_key_pair() -> &'static KeyPair {
    use std::sync::OnceLock;

    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate_with_bits(1024).expect("test key generation"))
}
