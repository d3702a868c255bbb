//! # TagVault Telemetry
//!
//! Logging and metrics shared by the TagVault binary and its services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagvault_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TV_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `TV_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `TV_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `TV_METRICS_PORT` | `9100` | Metrics port |
//! | `TV_SERVICE_NAME` | `tagvault` | Service name |
//! | `TV_ENVIRONMENT` | `development` | Environment label |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, register_metrics};
pub use tracing_setup::{env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and register metrics.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first, so nothing is lost if tracing setup fails.
    register_metrics()?;
    init_tracing(&config)?;
    Ok(TelemetryGuard { config })
}

/// Keeps telemetry configuration alive; logs on shutdown.
pub struct TelemetryGuard {
    config: TelemetryConfig,
}

impl TelemetryGuard {
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry");
    }
}
