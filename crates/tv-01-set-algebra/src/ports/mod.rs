//! Ports Layer
//!
//! `SetAlgebraApi` is the driving port used by the query router and tests.

use shared_types::TenantKey;

use crate::domain::{CacheStatistics, SetExpr, TagSet};

/// Set algebra with result caching (Driving Port).
///
/// `scope` partitions the cache per tenant; it does not filter operands.
pub trait SetAlgebraApi: Send + Sync {
    fn intersect(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet;

    fn union(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet;

    /// First operand minus every later operand.
    fn difference(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet;

    fn symmetric_difference(&self, scope: Option<&TenantKey>, sets: &[TagSet]) -> TagSet;

    /// Evaluate a nested expression; every operation node is cached.
    fn evaluate(&self, scope: Option<&TenantKey>, expr: &SetExpr) -> TagSet;

    fn cache_statistics(&self) -> CacheStatistics;

    fn clear_cache(&self);
}
