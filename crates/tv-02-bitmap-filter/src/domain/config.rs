//! Filter engine configuration.

use std::time::Duration;

/// Default slow-operation threshold.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Calls taking longer than this are logged at `warn`. The result is
    /// still returned.
    pub slow_threshold: Duration,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }
}

impl FilterConfig {
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }
}
