use chrono::Utc;
use dome_storage_shared::{OwnerPatch, StorageKind, UnitOwner};
use tracing::debug;

use super::{ProjectStore, RecordKind};
use crate::errors::StorageError;

/// Owners document kind.
#[derive(Debug, Clone, Copy)]
pub struct Owners;

impl RecordKind for Owners {
    type Record = UnitOwner;

    const KIND: StorageKind = StorageKind::Owners;
}

/// Unit owners of one project.
pub type UnitOwnersStore = ProjectStore<Owners>;

impl ProjectStore<Owners> {
    /// Assign `owner` to `unit_id`, replacing any previous owner.
    ///
    /// `assigned_at` is stamped with the current time regardless of the
    /// value passed in.
    pub fn add_owner(&mut self, unit_id: &str, mut owner: UnitOwner) -> Result<(), StorageError> {
        owner.assigned_at = Some(Utc::now());
        self.mutate(|owners| {
            owners.insert(unit_id.to_string(), owner);
        })
    }

    /// Merge `patch` into the owner of `unit_id`, keeping `assigned_at`.
    ///
    /// Returns `false` without writing when the unit has no owner.
    pub fn update_owner(&mut self, unit_id: &str, patch: &OwnerPatch) -> Result<bool, StorageError> {
        if !self.is_loaded() {
            self.load()?;
        }
        if !self.all().contains_key(unit_id) {
            debug!(project_id = %self.project_id(), unit_id, "No owner to update");
            return Ok(false);
        }
        self.mutate(|owners| {
            if let Some(owner) = owners.get_mut(unit_id) {
                owner.apply(patch);
            }
        })?;
        Ok(true)
    }

    /// Remove the owner of `unit_id`.
    ///
    /// Returns `false` without writing when the unit has no owner.
    pub fn remove_owner(&mut self, unit_id: &str) -> Result<bool, StorageError> {
        if !self.is_loaded() {
            self.load()?;
        }
        if !self.all().contains_key(unit_id) {
            return Ok(false);
        }
        self.mutate(|owners| {
            owners.remove(unit_id);
        })?;
        Ok(true)
    }
}
