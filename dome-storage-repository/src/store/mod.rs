//! Per-kind project stores.
//!
//! A [`ProjectStore`] owns the mapping of one record kind for one project.
//! It mirrors the stored document in memory and writes the whole document
//! through to the backend on every mutation. The in-memory mirror is only
//! replaced after the backend accepted the write, so a failed write leaves
//! both sides as they were.

mod owners;
mod statuses;

pub use owners::{Owners, UnitOwnersStore};
pub use statuses::{Statuses, UnitStatusStore};

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dome_storage_shared::{storage_key, StorageKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::interfaces::StorageBackend;

/// Binds a record type to the document kind it is stored in.
pub trait RecordKind {
    type Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send;

    const KIND: StorageKind;
}

/// Read and decode the document stored under `key`.
///
/// An absent key yields an empty mapping. A document that fails to decode is
/// logged and also yields an empty mapping; the stored value is left as is.
pub(crate) fn read_document<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Result<BTreeMap<String, T>, StorageError> {
    let Some(raw) = backend.get_item(key)? else {
        return Ok(BTreeMap::new());
    };
    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!(key, error = %e, "Malformed stored document, using empty mapping");
            Ok(BTreeMap::new())
        }
    }
}

/// Mapping of one record kind for one project, backed by a storage key.
pub struct ProjectStore<K: RecordKind> {
    backend: Arc<dyn StorageBackend>,
    project_id: String,
    key: String,
    records: BTreeMap<String, K::Record>,
    loaded: bool,
    _kind: PhantomData<K>,
}

impl<K: RecordKind> ProjectStore<K> {
    /// Create an unloaded store for `project_id`.
    ///
    /// Nothing is read until [`load`](Self::load) is called; until then the
    /// store reports `is_loaded() == false` and an empty mapping.
    pub fn new(backend: Arc<dyn StorageBackend>, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let key = storage_key(K::KIND, &project_id);
        Self {
            backend,
            project_id,
            key,
            records: BTreeMap::new(),
            loaded: false,
            _kind: PhantomData,
        }
    }

    /// Create a store and load its document.
    pub fn open(
        backend: Arc<dyn StorageBackend>,
        project_id: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let mut store = Self::new(backend, project_id);
        store.load()?;
        Ok(store)
    }

    /// Load the stored document into memory.
    ///
    /// A malformed document is not an error: the store starts empty and the
    /// stored value is left untouched.
    pub fn load(&mut self) -> Result<(), StorageError> {
        self.records = read_document(self.backend.as_ref(), &self.key)?;
        self.loaded = true;
        debug!(
            project_id = %self.project_id,
            key = %self.key,
            records = self.records.len(),
            "Loaded project store"
        );
        Ok(())
    }

    /// Re-read the stored document, picking up writes from other contexts.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.load()
    }

    /// True once the initial load completed, even if the mapping is empty.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Backend key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Look up the record for `unit_id` in the in-memory mirror.
    pub fn get(&self, unit_id: &str) -> Option<&K::Record> {
        self.records.get(unit_id)
    }

    pub fn all(&self) -> &BTreeMap<String, K::Record> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply `change` to a copy of the mapping, persist it, then publish it
    /// to memory.
    fn mutate<F>(&mut self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, K::Record>),
    {
        if !self.loaded {
            self.load()?;
        }
        let mut next = self.records.clone();
        change(&mut next);

        let document = serde_json::to_string(&next)?;
        self.backend.set_item(&self.key, &document)?;
        self.records = next;

        debug!(
            project_id = %self.project_id,
            key = %self.key,
            records = self.records.len(),
            "Persisted project store"
        );
        Ok(())
    }
}

impl<K: RecordKind> fmt::Debug for ProjectStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("key", &self.key)
            .field("loaded", &self.loaded)
            .field("records", &self.records)
            .finish()
    }
}
