//! Configuration types for cross-context synchronization.

/// Configuration for a cross-context change subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Forward events that remove one of the project's keys.
    ///
    /// Off by default: deletions made in another context are not reported,
    /// so subscribers only hear about keys that received a new value.
    pub forward_deletions: bool,
}

impl SyncConfig {
    /// Create a config that also forwards deletion events.
    ///
    /// # Returns
    ///
    /// A `SyncConfig` with `forward_deletions` set to `true`.
    pub fn with_deletions() -> Self {
        Self {
            forward_deletions: true,
        }
    }
}
