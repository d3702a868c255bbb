//! Query router configuration.

use std::time::Duration;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRouterConfig {
    /// Bound on each content tier call.
    pub timeout: Duration,
}

impl Default for QueryRouterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}
