//! Replica manager counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ReplicaMetrics {
    pub replicas_created: AtomicU64,
    pub records_obfuscated: AtomicU64,
    pub syncs_completed: AtomicU64,
    pub syncs_cancelled: AtomicU64,
    pub retries_queued: AtomicU64,
    pub retries_succeeded: AtomicU64,
    pub retries_dropped: AtomicU64,
    /// Jobs waiting in, or being run by, the retry queue.
    pub retry_queue_depth: AtomicU64,
}

impl ReplicaMetrics {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn job_finished(&self) {
        // Saturate at zero.
        let _ = self
            .retry_queue_depth
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(1));
    }

    pub fn snapshot(&self) -> ReplicaMetricsSnapshot {
        ReplicaMetricsSnapshot {
            replicas_created: self.replicas_created.load(Ordering::Relaxed),
            records_obfuscated: self.records_obfuscated.load(Ordering::Relaxed),
            syncs_completed: self.syncs_completed.load(Ordering::Relaxed),
            syncs_cancelled: self.syncs_cancelled.load(Ordering::Relaxed),
            retries_queued: self.retries_queued.load(Ordering::Relaxed),
            retries_succeeded: self.retries_succeeded.load(Ordering::Relaxed),
            retries_dropped: self.retries_dropped.load(Ordering::Relaxed),
            retry_queue_depth: self.retry_queue_depth.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicaMetricsSnapshot {
    pub replicas_created: u64,
    pub records_obfuscated: u64,
    pub syncs_completed: u64,
    pub syncs_cancelled: u64,
    pub retries_queued: u64,
    pub retries_succeeded: u64,
    pub retries_dropped: u64,
    pub retry_queue_depth: u64,
}
