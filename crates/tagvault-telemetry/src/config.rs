//! Telemetry configuration from environment variables.

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// JSON lines instead of the human-readable format
    pub json_logs: bool,

    /// Port the metrics endpoint is expected on
    pub metrics_port: u16,

    /// Deployment environment label (development, staging, production)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tagvault".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_port: 9100,
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TV_SERVICE_NAME`: Service name (default: tagvault)
    /// - `TV_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `TV_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `TV_JSON_LOGS`: JSON logs (default: true inside containers)
    /// - `TV_METRICS_PORT`: Metrics port (default: 9100)
    /// - `TV_ENVIRONMENT`: Environment label (default: development)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("TV_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("TV_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("TV_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: lookup("TV_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            metrics_port: lookup("TV_METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),

            environment: lookup("TV_ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Configuration for one named component, e.g. `replica-worker`.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("tagvault-{component}");
        config
    }
}
