//! Native storage: downloaded folders on the local filesystem.

pub mod local_fs;

pub use local_fs::LocalFs;
