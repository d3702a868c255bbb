//! Domain Layer
//!
//! Pure set algebra. No I/O, no tenant lookups: the tenant scope only
//! partitions the cache.

pub mod cache;
pub mod expression;
pub mod operations;
pub mod tag_set;

pub use cache::{CacheKey, CacheStatistics, ResultCache, DEFAULT_CACHE_CAPACITY};
pub use expression::SetExpr;
pub use operations::SetOperation;
pub use tag_set::TagSet;
