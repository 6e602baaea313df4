//! CLI command implementations (list, fetch).

pub mod fetch;
pub mod list;
