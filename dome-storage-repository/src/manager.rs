//! Whole-project bulk operations.
//!
//! The [`StorageManager`] works directly on the backend, independent of any
//! store: exports reflect whatever is committed at call time, and imports or
//! clears are not seen by already-loaded stores until they reload.

use std::sync::Arc;

use dome_storage_shared::{storage_key, ProjectStorageData, StorageKind};
use tracing::info;

use crate::config::SyncConfig;
use crate::errors::StorageError;
use crate::interfaces::{DownloadSink, StorageBackend};
use crate::store::read_document;
use crate::sync::{spawn_listener, SyncHandle};

/// Bulk export/import, backup, clear and change subscription for projects.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use dome_storage_repository::{MemoryBackend, StorageManager};
///
/// # fn example() -> Result<(), dome_storage_repository::StorageError> {
/// let manager = StorageManager::new(Arc::new(MemoryBackend::new()));
///
/// let backup = manager.export_project_data("resi")?;
/// manager.clear_project_data("resi")?;
/// manager.import_project_data(&backup)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StorageManager {
    backend: Arc<dyn StorageBackend>,
}

impl StorageManager {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Read both documents of `project_id` into a backup document.
    ///
    /// Each document is decoded on its own; an absent or malformed document
    /// contributes an empty mapping. The result is stamped with the current
    /// time.
    pub fn export_project_data(&self, project_id: &str) -> Result<ProjectStorageData, StorageError> {
        let owners = read_document(
            self.backend.as_ref(),
            &storage_key(StorageKind::Owners, project_id),
        )?;
        let statuses = read_document(
            self.backend.as_ref(),
            &storage_key(StorageKind::Statuses, project_id),
        )?;

        info!(
            project_id,
            owners = owners.len(),
            statuses = statuses.len(),
            "Exported project data"
        );
        Ok(ProjectStorageData::new(project_id, owners, statuses))
    }

    /// Overwrite both documents of `data.project_id` with the given mappings.
    ///
    /// Owners are written first. If the statuses write fails the owners
    /// document has already been replaced.
    pub fn import_project_data(&self, data: &ProjectStorageData) -> Result<(), StorageError> {
        let owners = serde_json::to_string(&data.owners)?;
        let statuses = serde_json::to_string(&data.statuses)?;

        self.backend
            .set_item(&storage_key(StorageKind::Owners, &data.project_id), &owners)?;
        self.backend.set_item(
            &storage_key(StorageKind::Statuses, &data.project_id),
            &statuses,
        )?;

        info!(
            project_id = %data.project_id,
            owners = data.owners.len(),
            statuses = data.statuses.len(),
            "Imported project data"
        );
        Ok(())
    }

    /// Export `project_id` and deliver it as a pretty-printed JSON file.
    ///
    /// # Returns
    ///
    /// The delivered file name, `dome-{project_id}-backup-{unix_millis}.json`.
    pub fn download_project_as_json(
        &self,
        project_id: &str,
        sink: &dyn DownloadSink,
    ) -> Result<String, StorageError> {
        let data = self.export_project_data(project_id)?;
        let contents = serde_json::to_string_pretty(&data)?;
        let file_name = data.backup_file_name();
        sink.deliver(&file_name, &contents)?;
        Ok(file_name)
    }

    /// Remove both documents of `project_id`. There is no undo.
    pub fn clear_project_data(&self, project_id: &str) -> Result<(), StorageError> {
        for kind in StorageKind::ALL {
            self.backend.remove_item(&storage_key(kind, project_id))?;
        }
        info!(project_id, "Cleared project data");
        Ok(())
    }

    /// Invoke `callback` whenever another context writes one of the
    /// project's documents.
    ///
    /// Removals are not forwarded; see [`setup_cross_tab_sync_with`].
    /// Must be called from within a Tokio runtime.
    ///
    /// [`setup_cross_tab_sync_with`]: Self::setup_cross_tab_sync_with
    pub fn setup_cross_tab_sync<F>(&self, project_id: &str, callback: F) -> SyncHandle
    where
        F: Fn() + Send + 'static,
    {
        self.setup_cross_tab_sync_with(project_id, SyncConfig::default(), callback)
    }

    /// Like [`setup_cross_tab_sync`](Self::setup_cross_tab_sync) with an
    /// explicit [`SyncConfig`].
    pub fn setup_cross_tab_sync_with<F>(
        &self,
        project_id: &str,
        config: SyncConfig,
        callback: F,
    ) -> SyncHandle
    where
        F: Fn() + Send + 'static,
    {
        let keys = StorageKind::ALL
            .iter()
            .map(|kind| storage_key(*kind, project_id))
            .collect();
        spawn_listener(self.backend.subscribe(), keys, config, callback)
    }
}
