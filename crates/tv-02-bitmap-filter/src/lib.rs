//! # TV-02 Bitmap Filter
//!
//! Set-theoretic filtering of card tag bitmaps, strictly scoped to one
//! tenant.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FilterRequest`, compiled `Predicate`s and
//!   the COMPLEX expression parser.
//! - **Ports Layer** (`ports/`): `BitmapFilterApi` (driving),
//!   `CardBitmapSource` (driven).
//! - **Service Layer** (`service/`): `BitmapFilterEngine`.
//! - **Handler Layer** (`handler/`): JSON request decoding.
//!
//! ## Request Kinds
//!
//! | Kind | Card qualifies iff | Method tag |
//! |------|--------------------|------------|
//! | MATCH | carries the bitmap | `bitmap_match` |
//! | AND | carries every queried bitmap | `bitmap_intersection` |
//! | OR | carries at least one queried bitmap | `bitmap_union` |
//! | NOT | carries `include`, lacks `exclude` | `bitmap_exclusion` |
//! | COMPLEX | satisfies the parsed expression | `bitmap_expression` |
//!
//! ## Isolation
//!
//! The input is restricted to the caller's tenant before evaluation.
//! A foreign record sharing a queried bitmap is discarded, never matched.

pub mod domain;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{Expr, FilterConfig, FilterRequest, Predicate, DEFAULT_SLOW_THRESHOLD, MAX_EXPRESSION_DEPTH};
pub use error::FilterError;
pub use handler::{FilterHandler, FilterRequestWire};
pub use metrics::{FilterMetrics, FilterMetricsSnapshot};
pub use ports::{BitmapFilterApi, CardBitmapSource};
pub use service::BitmapFilterEngine;
