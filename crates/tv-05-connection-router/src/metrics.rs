//! Router counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RouterStats {
    handles_opened: AtomicU64,
    handles_closed: AtomicU64,
    params_dropped: AtomicU64,
}

impl RouterStats {
    pub(crate) fn record_opened(&self) {
        self.handles_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_closed(&self) {
        self.handles_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self, count: usize) {
        self.params_dropped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RouterStatsSnapshot {
        RouterStatsSnapshot {
            handles_opened: self.handles_opened.load(Ordering::Relaxed),
            handles_closed: self.handles_closed.load(Ordering::Relaxed),
            params_dropped: self.params_dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStatsSnapshot {
    pub handles_opened: u64,
    pub handles_closed: u64,
    pub params_dropped: u64,
}

impl RouterStatsSnapshot {
    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> u64 {
        self.handles_opened.saturating_sub(self.handles_closed)
    }
}
