//! Cross-context change subscriptions.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::feed::{ChangeEvent, ChangeReceiver};

/// Handle to a running change subscription.
///
/// The listener stays registered until [`detach`](Self::detach) is called or
/// the handle is dropped.
#[must_use = "dropping the handle detaches the listener"]
#[derive(Debug)]
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Deregister the listener.
    ///
    /// Aborting only takes effect at the listener's next await point: on a
    /// multi-thread runtime a callback that is already running on another
    /// worker can still finish after this returns. Use
    /// [`detach_and_wait`](Self::detach_and_wait) when the caller must know
    /// the callback is no longer running.
    pub fn detach(self) {
        self.task.abort();
    }

    /// Deregister the listener and wait until its task has stopped.
    ///
    /// Once this resolves the callback is not running and is never invoked
    /// again.
    pub async fn detach_and_wait(mut self) {
        self.task.abort();
        if let Err(e) = (&mut self.task).await {
            if e.is_panic() {
                warn!(error = %e, "Sync listener panicked");
            }
        }
    }

    /// True while the listener is still running.
    pub fn is_attached(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Whether `event` concerns one of `keys` and should reach the subscriber.
pub(crate) fn is_relevant(event: &ChangeEvent, keys: &[String], config: &SyncConfig) -> bool {
    let matches_key = keys.iter().any(|key| event.key.contains(key.as_str()));
    matches_key && (config.forward_deletions || !event.is_deletion())
}

/// Spawn a task invoking `callback` once per relevant event.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn_listener<F>(
    mut receiver: ChangeReceiver,
    keys: Vec<String>,
    config: SyncConfig,
    callback: F,
) -> SyncHandle
where
    F: Fn() + Send + 'static,
{
    let task = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if is_relevant(&event, &keys, &config) {
                debug!(key = %event.key, origin = event.origin, "Forwarding storage change");
                callback();
            }
        }
    });
    SyncHandle { task }
}
