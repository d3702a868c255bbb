//! # Service Container
//!
//! Central container holding every service instance, with dependency
//! injection through the services' ports.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig, SERVER_SECRET_LEN};
pub use services::{ConcreteBitmapSyncService, ServiceContainer};
