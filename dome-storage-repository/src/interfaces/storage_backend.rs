//! Storage backend trait definition.

use crate::errors::StorageError;
use crate::feed::ChangeReceiver;

/// A synchronous string key-value store shared between execution contexts.
///
/// Implementations are injected into stores and the `StorageManager` as
/// `Arc<dyn StorageBackend>`. Every call completes before returning; there is
/// no suspension point inside a storage operation.
///
/// # Change notifications
///
/// Writes and removals that change a value must be published to the other
/// contexts of the backend, never to the context that made them. A write that
/// stores the value already present, or a removal of a missing key, publishes
/// nothing.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - If the key exists
    /// * `Ok(None)` - If the key is absent
    /// * `Err(StorageError)` - If the backend could not be read
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made by other contexts of this backend.
    fn subscribe(&self) -> ChangeReceiver;
}
