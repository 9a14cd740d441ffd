use std::collections::BTreeMap;

use chrono::Utc;
use dome_storage_shared::{SaleStatus, StorageKind, UnitStatus};

use super::{ProjectStore, RecordKind};
use crate::errors::StorageError;

/// Statuses document kind.
#[derive(Debug, Clone, Copy)]
pub struct Statuses;

impl RecordKind for Statuses {
    type Record = UnitStatus;

    const KIND: StorageKind = StorageKind::Statuses;
}

/// Unit sale statuses of one project.
pub type UnitStatusStore = ProjectStore<Statuses>;

impl ProjectStore<Statuses> {
    /// Replace the status record of `unit_id`.
    ///
    /// The whole record is overwritten: `notes` left as `None` clears any
    /// previous note. `changed_at` is stamped with the current time.
    pub fn update_status(
        &mut self,
        unit_id: &str,
        status: SaleStatus,
        changed_by: &str,
        notes: Option<&str>,
    ) -> Result<(), StorageError> {
        let record = UnitStatus {
            id: unit_id.to_string(),
            status,
            changed_at: Utc::now(),
            changed_by: changed_by.to_string(),
            notes: notes.map(str::to_string),
        };
        self.mutate(|statuses| {
            statuses.insert(unit_id.to_string(), record);
        })
    }

    /// Number of units currently in each status.
    pub fn status_counts(&self) -> BTreeMap<SaleStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in self.all().values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}
