//! # Operation Result Cache
//!
//! Bounded LRU keyed by (operation, tenant scope, operands).
//!
//! Entries and hit/miss counters live behind one lock, so statistics are
//! exact at every point a caller can observe them.

use lru::LruCache;
use parking_lot::Mutex;
use shared_types::TenantKey;
use std::num::NonZeroUsize;

use super::{SetOperation, TagSet};

/// Default number of cached results.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Cache key. Operands are stored by value so distinct inputs never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: SetOperation,
    pub scope: Option<TenantKey>,
    pub operands: Vec<TagSet>,
}

impl CacheKey {
    pub fn new(operation: SetOperation, scope: Option<&TenantKey>, operands: &[TagSet]) -> Self {
        Self {
            operation,
            scope: scope.cloned(),
            operands: operands.to_vec(),
        }
    }
}

/// Cache statistics for monitoring and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0.0 before the first access.
    pub hit_rate: f64,
    pub size: usize,
    pub capacity: usize,
}

struct CacheState {
    /// `None` when caching is disabled (capacity 0).
    entries: Option<LruCache<CacheKey, TagSet>>,
    hits: u64,
    misses: u64,
}

/// Thread-safe result cache.
pub struct ResultCache {
    state: Mutex<CacheState>,
    capacity: usize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create with custom capacity; 0 disables caching (every call misses).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: NonZeroUsize::new(capacity).map(LruCache::new),
                hits: 0,
                misses: 0,
            }),
            capacity,
        }
    }

    /// Look up `key`, counting a hit or a miss.
    pub fn get(&self, key: &CacheKey) -> Option<TagSet> {
        let mut state = self.state.lock();
        let found = state.entries.as_mut().and_then(|e| e.get(key).cloned());
        if found.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        found
    }

    /// Store a computed result. Evicts the least recently used entry when full.
    pub fn insert(&self, key: CacheKey, value: TagSet) {
        let mut state = self.state.lock();
        if let Some(entries) = state.entries.as_mut() {
            entries.put(key, value);
        }
    }

    /// Return the cached value for `key` or compute, store and return it.
    ///
    /// The computation runs outside the lock; concurrent misses on the same
    /// key may both compute, which is harmless because operations are pure.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> TagSet
    where
        F: FnOnce() -> TagSet,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drop all entries and reset counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        if let Some(entries) = state.entries.as_mut() {
            entries.clear();
        }
        state.hits = 0;
        state.misses = 0;
    }

    pub fn statistics(&self) -> CacheStatistics {
        let state = self.state.lock();
        let total = state.hits + state.misses;
        CacheStatistics {
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total > 0 {
                state.hits as f64 / total as f64
            } else {
                0.0
            },
            size: state.entries.as_ref().map_or(0, LruCache::len),
            capacity: self.capacity,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
