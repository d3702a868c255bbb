//! Query router counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct QueryMetrics {
    pub content_queries: AtomicU64,
    pub bitmap_queries: AtomicU64,
    pub filtered_queries: AtomicU64,
    pub failed_queries: AtomicU64,
    /// Foreign records returned by a tier.
    pub isolation_violations: AtomicU64,
    /// Browser records the bitmap phase did not match, dropped.
    pub unmatched_records_dropped: AtomicU64,
    pub timeouts: AtomicU64,
}

impl QueryMetrics {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueryMetricsSnapshot {
        QueryMetricsSnapshot {
            content_queries: self.content_queries.load(Ordering::Relaxed),
            bitmap_queries: self.bitmap_queries.load(Ordering::Relaxed),
            filtered_queries: self.filtered_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            isolation_violations: self.isolation_violations.load(Ordering::Relaxed),
            unmatched_records_dropped: self.unmatched_records_dropped.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryMetricsSnapshot {
    pub content_queries: u64,
    pub bitmap_queries: u64,
    pub filtered_queries: u64,
    pub failed_queries: u64,
    pub isolation_violations: u64,
    pub unmatched_records_dropped: u64,
    pub timeouts: u64,
}
