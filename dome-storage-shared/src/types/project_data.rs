use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OwnersMap, StatusesMap};

/// Backup document bundling both documents of one project.
///
/// Produced on demand by export and split back into the two stored
/// documents on import; it is never persisted under a key of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStorageData {
    pub project_id: String,
    #[serde(default)]
    pub owners: OwnersMap,
    #[serde(default)]
    pub statuses: StatusesMap,
    pub last_updated: DateTime<Utc>,
}

impl ProjectStorageData {
    /// Bundle the given documents, stamped with the current time.
    pub fn new(project_id: impl Into<String>, owners: OwnersMap, statuses: StatusesMap) -> Self {
        Self {
            project_id: project_id.into(),
            owners,
            statuses,
            last_updated: Utc::now(),
        }
    }

    /// Name of the downloadable backup file for this document.
    pub fn backup_file_name(&self) -> String {
        format!(
            "{}-{}-backup-{}.json",
            crate::KEY_PREFIX,
            self.project_id,
            self.last_updated.timestamp_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_document_shape() {
        let data = ProjectStorageData {
            project_id: "resi".to_string(),
            owners: OwnersMap::new(),
            statuses: StatusesMap::new(),
            last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["projectId"], "resi");
        assert_eq!(value["lastUpdated"], "2024-05-01T10:00:00Z");
        assert!(value["owners"].as_object().unwrap().is_empty());
        assert!(value["statuses"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_backup_file_name_uses_unix_millis() {
        let data = ProjectStorageData {
            project_id: "resi".to_string(),
            owners: OwnersMap::new(),
            statuses: StatusesMap::new(),
            last_updated: Utc.timestamp_millis_opt(1_714_557_600_123).unwrap(),
        };

        assert_eq!(data.backup_file_name(), "dome-resi-backup-1714557600123.json");
    }

    #[test]
    fn test_missing_mappings_default_to_empty() {
        let json = r#"{"projectId":"resi","lastUpdated":"2024-05-01T10:00:00Z"}"#;
        let data: ProjectStorageData = serde_json::from_str(json).unwrap();
        assert!(data.owners.is_empty());
        assert!(data.statuses.is_empty());
    }
}
