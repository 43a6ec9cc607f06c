//! Persisted search state error types.

use std::path::PathBuf;

/// Errors that can occur when writing search state to disk.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Reading or writing a state file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A state file could not be serialized
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
