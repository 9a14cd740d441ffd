use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted owners document: unit id to owner.
pub type OwnersMap = BTreeMap<String, UnitOwner>;

/// The person or entity assigned to a real-estate unit.
///
/// `assigned_at` is stamped when the owner is (re)assigned and is left
/// untouched by partial updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnitOwner {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Owner category (e.g. "persona", "empresa").
    #[serde(rename = "type")]
    pub owner_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl UnitOwner {
    /// Create an owner that has not been assigned yet.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        owner_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            owner_type: owner_type.into(),
            assigned_at: None,
        }
    }

    /// Merge the fields set in `patch` into this owner.
    ///
    /// `assigned_at` is never modified.
    pub fn apply(&mut self, patch: &OwnerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(owner_type) = &patch.owner_type {
            self.owner_type = owner_type.clone();
        }
    }
}

/// Partial update for a [`UnitOwner`].
///
/// Only the listed fields can be changed. Decoding a patch that names any
/// other field (including `assignedAt`) fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OwnerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

impl OwnerPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn owner_type(mut self, owner_type: impl Into<String>) -> Self {
        self.owner_type = Some(owner_type.into());
        self
    }

    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.owner_type.is_none()
    }
}
