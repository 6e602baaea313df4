//! RSASSA-PSS over SHA-256, applied to an already computed SHA-256 digest.

use rand::rngs::OsRng;
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use rsa::signature::SignatureEncoding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::{CryptoError, Result};

/// Sign a 32-byte digest. The salt is random, so repeated signatures differ.
pub fn pss_sign(private_key: &RsaPrivateKey, digest: &[u8]) -> Result<Vec<u8>> {
    let signing_key = BlindedSigningKey::<Sha256>::new(private_key.clone());

    let signature = signing_key
        .sign_prehash_with_rng(&mut OsRng, digest)
        .map_err(|e| CryptoError::Sign(e.to_string()))?;

    Ok(signature.to_vec())
}

/// Verify a signature produced by [`pss_sign`] over `digest`.
pub fn pss_verify(public_key: &RsaPublicKey, digest: &[u8], signature: &[u8]) -> Result<()> {
    let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());

    let signature = Signature::try_from(signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|e| CryptoError::Verify(e.to_string()))
}
