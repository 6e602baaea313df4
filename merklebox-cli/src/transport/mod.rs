//! Network transport: JSON over HTTP with `reqwest`.

pub mod http;

pub use http::HttpTransport;
