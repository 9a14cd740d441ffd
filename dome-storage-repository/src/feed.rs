//! Change notifications shared between execution contexts.
//!
//! A backend owns one [`ChangeFeed`]. Every context opened over the same
//! backend (one per "tab") gets its own origin id, and its
//! [`ChangeReceiver`] skips the events that context produced itself: a
//! writer never hears about its own writes.
//!
//! The feed knows nothing about how a backend stores values, so any backend
//! (in-memory, directory, a remote sync service) can publish the same events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// Default number of buffered events per feed before slow receivers lag.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Identifies the execution context that produced an event.
pub type ContextId = u64;

/// A single key modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
    pub old_value: Option<String>,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
    pub origin: ContextId,
}

impl ChangeEvent {
    /// True when the event carries no new value (the key was removed).
    pub fn is_deletion(&self) -> bool {
        self.new_value.as_deref().map_or(true, str::is_empty)
    }
}

/// Broadcast bus for [`ChangeEvent`]s, bound to one execution context.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    next_context: Arc<AtomicU64>,
    context: ContextId,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_context: Arc::new(AtomicU64::new(1)),
            context: 0,
        }
    }

    /// Open a new execution context on the same bus.
    pub fn context(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            next_context: Arc::clone(&self.next_context),
            context: self.next_context.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.context
    }

    /// Announce a change made by this context.
    pub fn publish(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        let event = ChangeEvent {
            key: key.to_string(),
            old_value,
            new_value,
            origin: self.context,
        };
        // No subscribers is the normal case for a lone context.
        let _ = self.sender.send(event);
    }

    /// Listen for changes made by every other context.
    pub fn subscribe(&self) -> ChangeReceiver {
        ChangeReceiver {
            inner: self.sender.subscribe(),
            context: self.context,
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a [`ChangeFeed`] subscription.
#[derive(Debug)]
pub struct ChangeReceiver {
    inner: broadcast::Receiver<ChangeEvent>,
    context: ContextId,
}

impl ChangeReceiver {
    /// Wait for the next event produced by another context.
    ///
    /// Returns `None` once every context of the backend has been dropped.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.inner.recv().await {
                Ok(event) if event.origin == self.context => continue,
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receiver_skips_own_events() {
        let tab_a = ChangeFeed::new();
        let tab_b = tab_a.context();
        let mut rx_a = tab_a.subscribe();

        tab_a.publish("own", None, Some("1".to_string()));
        tab_b.publish("other", None, Some("2".to_string()));

        let event = rx_a.recv().await.unwrap();
        assert_eq!(event.key, "other");
        assert_eq!(event.origin, tab_b.context_id());
    }

    #[test]
    fn test_contexts_get_distinct_ids() {
        let feed = ChangeFeed::new();
        let a = feed.context();
        let b = feed.context();
        assert_ne!(feed.context_id(), a.context_id());
        assert_ne!(a.context_id(), b.context_id());
    }

    #[tokio::test]
    async fn test_receiver_closes_when_feed_dropped() {
        let feed = ChangeFeed::new();
        let other = feed.context();
        let mut rx = feed.subscribe();
        drop(feed);
        drop(other);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_deletion_detection() {
        let mut event = ChangeEvent {
            key: "k".to_string(),
            old_value: Some("v".to_string()),
            new_value: None,
            origin: 1,
        };
        assert!(event.is_deletion());
        event.new_value = Some(String::new());
        assert!(event.is_deletion());
        event.new_value = Some("{}".to_string());
        assert!(!event.is_deletion());
    }
}
