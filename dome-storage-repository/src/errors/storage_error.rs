//! Storage error types.

use thiserror::Error;

/// Errors from storage operations.
///
/// A malformed stored document is not an error: stores and the manager fall
/// back to an empty mapping and log the failure. Everything else surfaces
/// here and is returned to the caller without retry.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused or failed a read/write (e.g. quota exceeded).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The key cannot be stored by this backend.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Failed to serialize a document before writing it.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error from a directory-backed backend or download sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }
}
