use std::path::PathBuf;

use crate::crypto::PublicKey;
use crate::error::MerkleBoxError;
use crate::manifest::SignedRoot;
use crate::merkle::{FileContent, Hash, MerkleError, MerkleTree};

/// Rebuild the Merkle root over local files, in the order given.
pub fn rebuild_root(paths: &[PathBuf]) -> Result<Hash, MerkleError> {
    let tree = MerkleTree::build(paths.iter().map(|path| FileContent::new(path)))?;
    Ok(tree.root_hash())
}

/// Check that the claimed root was signed by the holder of `public_key`.
pub fn authenticate(public_key: &PublicKey, signed: &SignedRoot) -> Result<(), MerkleBoxError> {
    if signed.verify(public_key) {
        Ok(())
    } else {
        Err(MerkleBoxError::Authentication(format!(
            "signature over root {} does not verify",
            hex::encode(signed.root)
        )))
    }
}

/// Compare the locally rebuilt root with the claimed one, byte for byte.
pub fn check_integrity(signed: &SignedRoot, local_root: &Hash) -> Result<(), MerkleBoxError> {
    if signed.root == *local_root {
        Ok(())
    } else {
        Err(MerkleBoxError::Integrity {
            expected: hex::encode(signed.root),
            actual: hex::encode(local_root),
        })
    }
}

/// Full local check: rebuild, then authenticate, then compare roots.
///
/// The signature is checked before the roots are compared, so a response
/// that is both badly signed and mismatched reports an authentication error.
pub fn verify_download(
    public_key: &PublicKey,
    signed: &SignedRoot,
    paths: &[PathBuf],
) -> Result<Hash, MerkleBoxError> {
    let local_root = rebuild_root(paths)?;
    authenticate(public_key, signed)?;
    check_integrity(signed, &local_root)?;
    Ok(local_root)
}
