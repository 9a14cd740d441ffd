//! # Dome Storage Repository
//!
//! Project-scoped key-value storage: per project, an owners document and a
//! statuses document held in a synchronous string backend, mirrored in
//! memory by per-kind stores, exported/imported/cleared in bulk by the
//! storage manager, and kept in step across execution contexts through a
//! change feed.

pub mod backends;
pub mod config;
pub mod download;
pub mod errors;
pub mod feed;
pub mod interfaces;
pub mod manager;
pub mod store;
pub mod sync;

pub use backends::{BackendSource, DirectoryBackend, MemoryBackend};
pub use config::SyncConfig;
pub use download::DirectorySink;
pub use errors::StorageError;
pub use feed::{ChangeEvent, ChangeFeed, ChangeReceiver};
pub use interfaces::{DownloadSink, StorageBackend};
pub use manager::StorageManager;
pub use store::{ProjectStore, RecordKind, UnitOwnersStore, UnitStatusStore};
pub use sync::SyncHandle;
