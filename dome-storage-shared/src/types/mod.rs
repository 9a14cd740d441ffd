mod project_data;
mod unit_owner;
mod unit_status;

pub use project_data::ProjectStorageData;
pub use unit_owner::{OwnerPatch, OwnersMap, UnitOwner};
pub use unit_status::{ParseStatusError, SaleStatus, StatusesMap, UnitStatus};
