//! # Dome Storage Shared
//!
//! Record types persisted per project (unit owners and unit sale statuses),
//! the export document that bundles them, and the storage key convention
//! every crate in the workspace derives its keys from.

pub mod keys;
pub mod types;

pub use keys::{storage_key, StorageKind, KEY_PREFIX};
pub use types::{
    OwnersMap, OwnerPatch, ParseStatusError, ProjectStorageData, SaleStatus, StatusesMap,
    UnitOwner, UnitStatus,
};
