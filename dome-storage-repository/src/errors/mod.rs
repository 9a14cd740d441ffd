//! Error types for the storage repository.
//!
//! This module provides a unified error type for all storage operations.

mod storage_error;

pub use storage_error::StorageError;
