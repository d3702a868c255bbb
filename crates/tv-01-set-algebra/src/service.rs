//! Set Algebra Service
//!
//! Implements `SetAlgebraApi` over the domain operations and the result
//! cache. One instance is owned by the runtime container and shared by
//! reference; tests create their own.

use shared_types::TenantKey;
use tracing::{debug, trace};

use crate::domain::{CacheKey, CacheStatistics, ResultCache, SetExpr, SetOperation, TagSet};
use crate::ports::SetAlgebraApi;

pub struct SetAlgebraService {
    cache: ResultCache,
}

impl SetAlgebraService {
    /// Create with the default cache capacity.
    pub fn new() -> Self {
        Self {
            cache: ResultCache::new(),
        }
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: ResultCache::with_capacity(capacity),
        }
    }

    fn cached(&self, operation: SetOperation, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet {
        let key = CacheKey::new(operation, scope, sets);
        self.cache.get_or_compute(key, || {
            trace!(
                operation = operation.as_str(),
                operands = sets.len(),
                "set algebra cache miss"
            );
            operation.apply(sets)
        })
    }
}

impl Default for SetAlgebraService {
    fn default() -> Self {
        Self::new()
    }
}

impl SetAlgebraApi for SetAlgebraService {
    fn intersect(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet {
        self.cached(SetOperation::Intersect, scope, sets)
    }

    fn union(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet {
        self.cached(SetOperation::Union, scope, sets)
    }

    fn difference(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet {
        self.cached(SetOperation::Difference, scope, sets)
    }

    fn symmetric_difference(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet {
        self.cached(SetOperation::SymmetricDifference, scope, sets)
    }

    fn evaluate(&self, scope: Option<&TenantKey>, expr: &SetExpr) -> TagSet {
        expr.fold(&mut |operation: SetOperation, operands: &[TagSet]| {
            self.cached(operation, scope, operands)
        })
    }

    fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }

    fn clear_cache(&self) {
        self.cache.clear();
        debug!("set algebra cache cleared");
    }
}
