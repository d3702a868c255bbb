//! Domain Layer

pub mod composite;
pub mod config;

pub use composite::CompositeResult;
pub use config::{QueryRouterConfig, DEFAULT_QUERY_TIMEOUT};
