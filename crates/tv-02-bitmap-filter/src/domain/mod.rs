//! Domain Layer
//!
//! Pure filtering logic: request validation, expression parsing and
//! per-card predicates. No I/O, no async.

pub mod config;
pub mod expression;
pub mod request;

pub use config::{FilterConfig, DEFAULT_SLOW_THRESHOLD};
pub use expression::{Expr, MAX_EXPRESSION_DEPTH};
pub use request::{FilterRequest, Predicate};
