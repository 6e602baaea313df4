//! MerkleBox server: publishes the subfolders of one directory, each with a
//! freshly computed and signed Merkle root.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
