//! Seams between the verification session and the platform it runs on.

pub mod transport;
pub mod storage;
