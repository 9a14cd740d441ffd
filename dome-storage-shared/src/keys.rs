//! Storage key derivation.
//!
//! Every project owns two documents in the backend, one per [`StorageKind`].
//! Keys follow the `dome-{project_id}-{kind}` convention and are only ever
//! built through [`storage_key`].

use std::fmt;

/// Prefix shared by every key this workspace writes.
pub const KEY_PREFIX: &str = "dome";

/// The kinds of per-project documents held in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Mapping from unit id to its assigned owner.
    Owners,
    /// Mapping from unit id to its current sale status.
    Statuses,
}

impl StorageKind {
    /// All kinds, in the order they are written during import.
    pub const ALL: [StorageKind; 2] = [StorageKind::Owners, StorageKind::Statuses];

    /// Returns the key suffix for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Owners => "owners",
            StorageKind::Statuses => "statuses",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the backend key holding `kind` for `project_id`.
///
/// ```
/// use dome_storage_shared::{storage_key, StorageKind};
///
/// assert_eq!(storage_key(StorageKind::Owners, "resi"), "dome-resi-owners");
/// ```
pub fn storage_key(kind: StorageKind, project_id: &str) -> String {
    format!("{}-{}-{}", KEY_PREFIX, project_id, kind.as_str())
}
