use std::io::{self, Read};

use sha2::{Digest, Sha256};

use crate::constants::HASH_LEN;

/// A SHA-256 digest.
pub type Hash = [u8; HASH_LEN];

/// Hash a byte slice.
pub fn hash_bytes(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash everything a reader yields, streaming.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<Hash> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().into())
}

/// Parent hash: SHA-256 over the raw concatenation `left || right`.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_known_vector() {
        assert_eq!(
            hex::encode(hash_bytes(b"hello")),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_hash_reader_matches_hash_bytes() {
        let data = vec![7u8; 100_000];
        let streamed = hash_reader(&data[..]).unwrap();
        assert_eq!(streamed, hash_bytes(&data));
    }

    #[test]
    fn test_hash_pair_is_plain_concatenation() {
        let left = hash_bytes(b"hello");
        let right = hash_bytes(b"world");

        let mut joined = left.to_vec();
        joined.extend_from_slice(&right);

        assert_eq!(hash_pair(&left, &right), hash_bytes(&joined));
        assert_ne!(hash_pair(&left, &right), hash_pair(&right, &left));
    }
}
