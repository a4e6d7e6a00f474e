//! Error types for telop definition loading and persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors during telop definition loading and position persistence
#[derive(Debug, Error)]
pub enum TelopError {
    #[error("failed to read telop file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse telop TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("failed to read telop directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist telop positions")]
    PersistPositions {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
