//! Metrics for bitmap filter operations
//!
//! Lock-free counters read through [`FilterMetrics::snapshot`]. The runtime
//! publishes snapshots to Prometheus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use shared_types::FilterKind;

/// Thread-safe filter counters.
#[derive(Default)]
pub struct FilterMetrics {
    pub match_operations: AtomicU64,
    pub and_operations: AtomicU64,
    pub or_operations: AtomicU64,
    pub not_operations: AtomicU64,
    pub complex_operations: AtomicU64,
    /// Requests rejected before scanning (validation).
    pub rejected_requests: AtomicU64,
    /// Same-tenant cards evaluated.
    pub cards_scanned: AtomicU64,
    /// Records dropped because they belonged to another tenant.
    pub foreign_records_discarded: AtomicU64,
    /// Calls slower than the configured threshold.
    pub slow_operations: AtomicU64,
    /// Cumulative filter time in nanoseconds
    pub filter_time_ns: AtomicU64,
}

impl FilterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed filter call.
    pub fn record_filter(&self, kind: FilterKind, scanned: usize, discarded: usize, duration: Duration) {
        let counter = match kind {
            FilterKind::Match => &self.match_operations,
            FilterKind::And => &self.and_operations,
            FilterKind::Or => &self.or_operations,
            FilterKind::Not => &self.not_operations,
            FilterKind::Complex => &self.complex_operations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.cards_scanned.fetch_add(scanned as u64, Ordering::Relaxed);
        self.foreign_records_discarded
            .fetch_add(discarded as u64, Ordering::Relaxed);
        self.filter_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_slow(&self) {
        self.slow_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Total completed filter calls of every kind.
    pub fn total_operations(&self) -> u64 {
        [
            &self.match_operations,
            &self.and_operations,
            &self.or_operations,
            &self.not_operations,
            &self.complex_operations,
        ]
        .iter()
        .map(|c| c.load(Ordering::Relaxed))
        .sum()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> FilterMetricsSnapshot {
        let total = self.total_operations();
        let time = self.filter_time_ns.load(Ordering::Relaxed);
        FilterMetricsSnapshot {
            match_operations: self.match_operations.load(Ordering::Relaxed),
            and_operations: self.and_operations.load(Ordering::Relaxed),
            or_operations: self.or_operations.load(Ordering::Relaxed),
            not_operations: self.not_operations.load(Ordering::Relaxed),
            complex_operations: self.complex_operations.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            cards_scanned: self.cards_scanned.load(Ordering::Relaxed),
            foreign_records_discarded: self.foreign_records_discarded.load(Ordering::Relaxed),
            slow_operations: self.slow_operations.load(Ordering::Relaxed),
            avg_filter_ns: if total > 0 { time / total } else { 0 },
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterMetricsSnapshot {
    pub match_operations: u64,
    pub and_operations: u64,
    pub or_operations: u64,
    pub not_operations: u64,
    pub complex_operations: u64,
    pub rejected_requests: u64,
    pub cards_scanned: u64,
    pub foreign_records_discarded: u64,
    pub slow_operations: u64,
    pub avg_filter_ns: u64,
}

impl FilterMetricsSnapshot {
    pub fn total_operations(&self) -> u64 {
        self.match_operations
            + self.and_operations
            + self.or_operations
            + self.not_operations
            + self.complex_operations
    }
}
