//! Retry policy and jobs for deferred replica syncs.

use std::time::Duration;

use shared_types::TenantKey;
use uuid::Uuid;

use super::BrowserSnapshot;

/// Exponential backoff: `initial * multiplier^attempt`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
    /// Attempts made by the retry worker before a job is dropped.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            multiplier: 2,
            max_delay: Duration::from_secs(30),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    pub fn is_exhausted(&self, attempts_made: u32) -> bool {
        attempts_made >= self.max_attempts
    }
}

/// A sync deferred after a connectivity error or timeout.
#[derive(Debug, Clone)]
pub struct RetryJob {
    pub id: Uuid,
    pub tenant: TenantKey,
    pub snapshot: BrowserSnapshot,
    /// Attempts already made by the worker.
    pub attempts: u32,
    pub last_error: String,
}

impl RetryJob {
    pub fn new(tenant: TenantKey, snapshot: BrowserSnapshot, error: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant,
            snapshot,
            attempts: 0,
            last_error: error,
        }
    }
}
