//! Interface definitions for storage backends and download targets.
//!
//! These traits allow swappable backends (in-memory, directory, remote) and
//! swappable host download primitives.

mod download_sink;
mod storage_backend;

pub use download_sink::DownloadSink;
pub use storage_backend::StorageBackend;
