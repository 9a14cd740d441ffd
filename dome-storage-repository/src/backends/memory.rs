use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::StorageError;
use crate::feed::{ChangeFeed, ChangeReceiver};
use crate::interfaces::StorageBackend;

/// In-memory backend.
///
/// Clones made with [`MemoryBackend::context`] share the same items and
/// change feed but act as separate execution contexts, the way browser tabs
/// share one origin's storage.
pub struct MemoryBackend {
    items: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    feed: ChangeFeed,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
            feed: ChangeFeed::new(),
        }
    }

    /// Open another execution context over the same storage.
    pub fn context(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            fail_writes: Arc::clone(&self.fail_writes),
            feed: self.feed.context(),
        }
    }

    /// Make every subsequent write and removal fail, as a full quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend(format!(
                "storage quota exceeded writing {}",
                key
            )));
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StorageError {
    StorageError::backend("memory backend lock poisoned")
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let old_value = {
            let mut items = self.items.write().map_err(|_| poisoned())?;
            items.insert(key.to_string(), value.to_string())
        };
        if old_value.as_deref() != Some(value) {
            self.feed.publish(key, old_value, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let old_value = {
            let mut items = self.items.write().map_err(|_| poisoned())?;
            items.remove(key)
        };
        if old_value.is_some() {
            self.feed.publish(key, old_value, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> ChangeReceiver {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("k").unwrap(), None);

        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v"));

        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);

        // Removing again is fine
        backend.remove_item("k").unwrap();
    }

    #[test]
    fn test_contexts_share_items() {
        let tab_a = MemoryBackend::new();
        let tab_b = tab_a.context();

        tab_a.set_item("k", "v").unwrap();
        assert_eq!(tab_b.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_failing_writes() {
        let backend = MemoryBackend::new();
        backend.set_item("k", "v").unwrap();
        backend.set_fail_writes(true);

        assert!(matches!(
            backend.set_item("k", "w"),
            Err(StorageError::Backend(_))
        ));
        assert!(backend.remove_item("k").is_err());
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_other_context_is_notified() {
        let tab_a = MemoryBackend::new();
        let tab_b = tab_a.context();
        let mut rx_b = tab_b.subscribe();

        tab_a.set_item("k", "v").unwrap();
        tab_a.remove_item("k").unwrap();

        let write = rx_b.recv().await.unwrap();
        assert_eq!(write.new_value.as_deref(), Some("v"));
        assert_eq!(write.old_value, None);

        let removal = rx_b.recv().await.unwrap();
        assert!(removal.is_deletion());
        assert_eq!(removal.old_value.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_writer_is_not_notified() {
        let backend = MemoryBackend::new();
        let mut rx = backend.subscribe();

        backend.set_item("k", "v").unwrap();

        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_unchanged_value_is_not_published() {
        let tab_a = MemoryBackend::new();
        let tab_b = tab_a.context();
        tab_a.set_item("k", "v").unwrap();

        let mut rx_b = tab_b.subscribe();
        tab_a.set_item("k", "v").unwrap();

        assert!(timeout(Duration::from_millis(50), rx_b.recv()).await.is_err());
    }
}
