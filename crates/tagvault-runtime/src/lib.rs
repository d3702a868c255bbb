//! # TagVault Runtime Library
//!
//! Exposes the runtime's modules for the binary and for tests.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the service container
//! - `adapters/` - port implementations crossing service boundaries
//! - `runtime` - background workers and graceful shutdown
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging, Prometheus registry)
//! 2. Load configuration from `TV_*` variables
//! 3. Validate the server secret (outside dev mode)
//! 4. Build the service container in dependency order
//! 5. Start the replica retry worker and the metrics publisher
//! 6. Run until Ctrl+C, then shut down gracefully

pub mod adapters;
pub mod container;
pub mod runtime;

pub use container::{ConfigError, RuntimeConfig, ServiceContainer};
pub use runtime::TagVaultRuntime;
