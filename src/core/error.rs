//! Error types for unidb.
//!
//! All errors that can occur in the application are defined here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, UniError>;

/// All errors that can occur in the unidb application.
#[derive(Error, Debug)]
pub enum UniError {
    /// The store file is missing and the command needs an existing one.
    #[error("{} not found. Please run `unidb setup` first.", .0.display())]
    StorageUnavailable(PathBuf),

    /// Any failure raised by the storage engine.
    #[error("{0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No read query is registered under this name.
    #[error("Unknown query: {0}. Use `unidb list` to see available queries.")]
    UnknownQuery(String),
}

impl UniError {
    /// Returns a stable short code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            UniError::StorageUnavailable(_) => "StorageUnavailable",
            UniError::Storage(_) => "StorageError",
            UniError::Io(_) => "IoError",
            UniError::Json(_) => "JsonError",
            UniError::UnknownQuery(_) => "UnknownQuery",
        }
    }

    /// Whether the error came from the storage engine itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, UniError::Storage(_))
    }
}
