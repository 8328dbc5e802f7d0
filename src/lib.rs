//! ddev-config - configuration store for the ddev integrations tooling.
//!
//! This library provides the core functionality for the `ddev` CLI tool:
//! the default schema, the atomically persisted `config.toml` document, and
//! dotted-path assignment (`ddev config set github.user ofek`).

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;


/// Library-level error type for ddev-config operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidPath(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Result type alias for ddev-config operations.
pub type Result<T> = std::result::Result<T, Error>;
