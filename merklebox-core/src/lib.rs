//! Platform-independent integrity library for signed folder distribution.
//!
//! The Merkle tree rules, root signing, and the client verification session
//! live here so that server and client hash and pair content identically.

pub mod error;
pub mod constants;
pub mod traits;
pub mod crypto;
pub mod merkle;
pub mod manifest;
pub mod sync;
