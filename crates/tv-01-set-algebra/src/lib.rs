//! # TV-01 Set Algebra
//!
//! Intersection, union, difference and symmetric difference over immutable
//! tag/card sets, plus nested set expressions, with every result cached.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure set operations, expression trees and
//!   the bounded result cache.
//! - **Ports Layer** (`ports/`): `SetAlgebraApi`, the driving port.
//! - **Service Layer** (`service`): `SetAlgebraService`, owns the cache.
//!
//! ## Cache Contract
//!
//! - Key = (operation, tenant scope, operands). Operands are compared by value,
//!   so two different operand lists never share an entry.
//! - Capacity defaults to 1000 entries; least-recently-used entries are
//!   evicted once full. Capacity 0 disables caching.
//! - `cache_statistics()` is exact: hits and misses are counted under the same
//!   lock that guards the entries.
//!
//! ## Usage Example
//!
//! ```ignore
//! use tv_01_set_algebra::{SetAlgebraApi, SetAlgebraService, TagSet};
//!
//! let algebra = SetAlgebraService::new();
//! let a = TagSet::from_iter(["c1", "c2"]);
//! let b = TagSet::from_iter(["c2", "c3"]);
//! let both = algebra.intersect(Some(&tenant), &[a, b]);
//! assert_eq!(both, TagSet::from_iter(["c2"]));
//! ```

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod properties;

// Re-exports for convenience
pub use domain::{CacheStatistics, ResultCache, SetExpr, SetOperation, TagSet, DEFAULT_CACHE_CAPACITY};
pub use ports::SetAlgebraApi;
pub use service::SetAlgebraService;
