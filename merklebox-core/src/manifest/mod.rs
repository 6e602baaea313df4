//! Signed roots and the JSON messages that carry them between server and client.

pub mod signed_root;
pub mod wire;
pub mod serialization;

pub use signed_root::SignedRoot;
pub use wire::{FolderListResponse, MerkleResponse, ResponseCode};
