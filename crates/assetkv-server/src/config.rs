use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use assetkv_core::KeyEncoding;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory served as the namespace.
    pub root: PathBuf,
    pub key_encoding: KeyEncoding,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            root: PathBuf::from("."),
            key_encoding: KeyEncoding::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml(source: &str) -> ServerResult<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&source)
    }
}
