//! Session storage errors.

use std::path::PathBuf;

use thiserror::Error;

/// Durable session storage failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine home directory")]
    NoHomeDirectory,

    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NoHomeDirectory => "E_STORE_HOME",
            StorageError::Io { .. } => "E_STORE_IO",
            StorageError::Corrupt { .. } => "E_STORE_CORRUPT",
            StorageError::Serialization(_) => "E_STORE_SERDE",
            StorageError::Unavailable(_) => "E_STORE_UNAVAILABLE",
        }
    }
}
