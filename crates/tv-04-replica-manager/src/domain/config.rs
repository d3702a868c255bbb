//! Replica manager configuration.

use std::time::Duration;

use super::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaConfig {
    /// Bound on replica creation plus schema provisioning.
    pub creation_timeout: Duration,
    /// Bound on one `sync_browser_to_server` run.
    pub sync_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            creation_timeout: Duration::from_secs(10),
            sync_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}
