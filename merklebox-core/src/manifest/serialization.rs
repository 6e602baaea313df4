use serde::{de::DeserializeOwned, Serialize};

use crate::error::MerkleBoxError;

pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, MerkleBoxError> {
    serde_json::to_vec(value).map_err(|e| MerkleBoxError::Serialization(e.to_string()))
}

pub fn from_json<T: DeserializeOwned>(data: &[u8]) -> Result<T, MerkleBoxError> {
    serde_json::from_slice(data).map_err(|e| MerkleBoxError::MalformedResponse(e.to_string()))
}

/// Serde adapter writing byte vectors as lowercase hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        #[serde(with = "hex_bytes")]
        data: Vec<u8>,
    }

    #[test]
    fn test_hex_bytes_encoding() {
        let blob = Blob { data: vec![0xde, 0xad, 0xbe, 0xef] };
        let json = to_json(&blob).unwrap();
        assert_eq!(json, br#"{"data":"deadbeef"}"#);

        let decoded: Blob = from_json(&json).unwrap();
        assert_eq!(decoded, blob);
    }

    #[test]
    fn test_invalid_hex_is_malformed() {
        let result: Result<Blob, _> = from_json(br#"{"data":"xyz"}"#);
        assert!(matches!(result, Err(MerkleBoxError::MalformedResponse(_))));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result: Result<Blob, _> = from_json(b"<html>");
        assert!(matches!(result, Err(MerkleBoxError::MalformedResponse(_))));
    }
}
