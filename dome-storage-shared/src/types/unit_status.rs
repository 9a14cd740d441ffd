use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted statuses document: unit id to status record.
pub type StatusesMap = BTreeMap<String, UnitStatus>;

/// Sale/availability state of a unit.
///
/// The persisted spellings are mixed-case and must be kept as they are.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaleStatus {
    #[serde(rename = "DISPONIBLE")]
    Available,
    #[serde(rename = "bloqueado")]
    Blocked,
    #[serde(rename = "reservado")]
    Reserved,
    #[serde(rename = "VENDIDO")]
    Sold,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 4] = [
        SaleStatus::Available,
        SaleStatus::Blocked,
        SaleStatus::Reserved,
        SaleStatus::Sold,
    ];

    /// Returns the persisted name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Available => "DISPONIBLE",
            SaleStatus::Blocked => "bloqueado",
            SaleStatus::Reserved => "reservado",
            SaleStatus::Sold => "VENDIDO",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when text does not name one of the four sale statuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown unit status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for SaleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SaleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Latest status record of a unit. There is no history: each update
/// replaces the previous record for the same unit id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatus {
    /// Unit identifier; matches the key the record is stored under.
    pub id: String,
    pub status: SaleStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_wire_names() {
        let names: Vec<String> = SaleStatus::ALL
            .iter()
            .map(|status| serde_json::to_string(status).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "\"DISPONIBLE\"",
                "\"bloqueado\"",
                "\"reservado\"",
                "\"VENDIDO\""
            ]
        );
    }

    #[test]
    fn test_status_from_str_is_exact() {
        assert_eq!("reservado".parse::<SaleStatus>(), Ok(SaleStatus::Reserved));
        assert_eq!("VENDIDO".parse::<SaleStatus>(), Ok(SaleStatus::Sold));
        assert_eq!(
            "vendido".parse::<SaleStatus>(),
            Err(ParseStatusError("vendido".to_string()))
        );
    }

    #[test]
    fn test_unknown_status_fails_to_decode() {
        let json = r#"{"id":"A101","status":"ALQUILADO","changedAt":"2024-05-01T10:00:00Z","changedBy":"agent7"}"#;
        assert!(serde_json::from_str::<UnitStatus>(json).is_err());
    }

    #[test]
    fn test_status_record_json_shape() {
        let record = UnitStatus {
            id: "A101".to_string(),
            status: SaleStatus::Blocked,
            changed_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            changed_by: "agent7".to_string(),
            notes: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "bloqueado");
        assert_eq!(value["changedBy"], "agent7");
        assert_eq!(value["changedAt"], "2024-05-01T10:00:00Z");
        assert!(value.get("notes").is_none());
    }
}
