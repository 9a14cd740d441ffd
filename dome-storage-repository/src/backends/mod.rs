//! Storage backend implementations.
//!
//! ## Usage
//!
//! ```ignore
//! use dome_storage_repository::backends::BackendSource;
//!
//! // Tests/development: in-memory storage
//! let backend = BackendSource::memory().into_backend()?;
//!
//! // Durable storage: one file per key under a directory
//! let backend = BackendSource::directory("./dome-storage").into_backend()?;
//! ```

mod directory;
mod memory;

pub use directory::DirectoryBackend;
pub use memory::MemoryBackend;

use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::StorageError;
use crate::interfaces::StorageBackend;

/// Explicit choice between the in-memory and the directory backend.
#[derive(Debug, Clone)]
pub enum BackendSource {
    /// Volatile in-memory storage.
    Memory,

    /// Files under a root directory.
    Directory {
        /// Directory holding one file per key
        root: PathBuf,
    },
}

impl BackendSource {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory { root: root.into() }
    }

    /// Create the backend described by this source.
    pub fn into_backend(self) -> Result<Arc<dyn StorageBackend>, StorageError> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryBackend::new())),
            Self::Directory { root } => Ok(Arc::new(DirectoryBackend::open(root)?)),
        }
    }
}
