use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use merklebox_core::constants::{DEFAULT_DIRECTORY, DEFAULT_PORT};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind: IpAddr,
    /// Port for the HTTP listener.
    pub port: u16,
    /// Directory whose subfolders are published.
    pub directory: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `MERKLEBOX_BIND` (optional, default 0.0.0.0): Listen address.
    /// - `MERKLEBOX_PORT` (optional, default 8100): Listen port.
    /// - `MERKLEBOX_DIRECTORY` (optional, default ./MerkleFiles): Published directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading values through `lookup`.
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("MERKLEBOX_BIND")
            .and_then(|s| s.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let port = lookup("MERKLEBOX_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let directory = lookup("MERKLEBOX_DIRECTORY")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        Self {
            bind,
            port,
            directory,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
