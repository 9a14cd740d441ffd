//! Error types for the operator tool.

use dome_storage_repository::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Error from the storage layer.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON encoding or decoding failed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
