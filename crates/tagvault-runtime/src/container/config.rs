//! # Runtime Configuration
//!
//! Configuration for every service, read once at startup.
//!
//! ## Security Requirements
//!
//! - `server_secret` MUST NOT be the all-zero default outside dev mode: every
//!   tenant's obfuscation key is derived from it.
//! - All timeouts and limits have sane defaults with override capability.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TV_MODE` | `normal` | `dev`, `normal` or `privacy`; anything else is `normal` |
//! | `TV_SERVER_SECRET` | all zero | 32-byte server secret, hex encoded |
//! | `TV_SERVER_STORE_URL` | `https://store.tagvault.local` | Server store |
//! | `TV_LOCAL_STORE_URL` | `file:tagvault-dev.db` | Local store (dev) |
//! | `TV_CACHE_CAPACITY` | `1000` | Set algebra cache entries, 0 disables |
//! | `TV_REPLICA_TIMEOUT_MS` | `10000` | Replica creation bound |
//! | `TV_QUERY_TIMEOUT_MS` | `5000` | Content tier call bound |
//! | `TV_SLOW_FILTER_MS` | `100` | Slow filter warning threshold |
//! | `TV_RETRY_MAX_ATTEMPTS` | `5` | Replica sync retries before a job is dropped |
//! | `TV_DATA_DIR` | unset | RocksDB replica directory (`rocksdb` feature) |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared_types::OperatingMode;
use thiserror::Error;
use tv_01_set_algebra::DEFAULT_CACHE_CAPACITY;
use tv_02_bitmap_filter::FilterConfig;
use tv_04_replica_manager::ReplicaConfig;
use tv_05_connection_router::domain::{DEFAULT_LOCAL_STORE_URL, DEFAULT_SERVER_STORE_URL};
use tv_06_query_router::QueryRouterConfig;
use zeroize::Zeroizing;

/// Length of the server secret in bytes.
pub const SERVER_SECRET_LEN: usize = 32;

/// Complete runtime configuration.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub mode: OperatingMode,
    /// Root secret for per-tenant obfuscation keys.
    pub server_secret: Zeroizing<[u8; SERVER_SECRET_LEN]>,
    pub server_store_url: String,
    pub local_store_url: String,
    pub cache_capacity: usize,
    pub replica: ReplicaConfig,
    pub query: QueryRouterConfig,
    pub filter: FilterConfig,
    /// Where the RocksDB replica backend keeps its files.
    pub data_dir: Option<PathBuf>,
    /// How often service counters are copied into Prometheus gauges.
    pub metrics_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Normal,
            server_secret: Zeroizing::new([0u8; SERVER_SECRET_LEN]), // MUST be overridden in production
            server_store_url: DEFAULT_SERVER_STORE_URL.to_string(),
            local_store_url: DEFAULT_LOCAL_STORE_URL.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            replica: ReplicaConfig::default(),
            query: QueryRouterConfig::default(),
            filter: FilterConfig::default(),
            data_dir: None,
            metrics_interval: Duration::from_secs(5),
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("mode", &self.mode)
            .field("server_secret", &"<redacted>")
            .field("server_store_url", &self.server_store_url)
            .field("local_store_url", &self.local_store_url)
            .field("cache_capacity", &self.cache_capacity)
            .field("replica", &self.replica)
            .field("query", &self.query)
            .field("filter", &self.filter)
            .field("data_dir", &self.data_dir)
            .field("metrics_interval", &self.metrics_interval)
            .finish()
    }
}

impl RuntimeConfig {
    /// Load configuration from `TV_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup("TV_MODE") {
            config.mode = OperatingMode::from_config_value(&mode);
        }
        if let Some(secret) = lookup("TV_SERVER_SECRET") {
            config.server_secret = parse_secret(&secret)?;
        }
        if let Some(url) = lookup("TV_SERVER_STORE_URL") {
            config.server_store_url = url;
        }
        if let Some(url) = lookup("TV_LOCAL_STORE_URL") {
            config.local_store_url = url;
        }
        if let Some(value) = lookup("TV_CACHE_CAPACITY") {
            config.cache_capacity = parse_number("TV_CACHE_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("TV_REPLICA_TIMEOUT_MS") {
            config.replica.creation_timeout = parse_millis("TV_REPLICA_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("TV_QUERY_TIMEOUT_MS") {
            config.query.timeout = parse_millis("TV_QUERY_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("TV_SLOW_FILTER_MS") {
            config.filter.slow_threshold = parse_millis("TV_SLOW_FILTER_MS", &value)?;
        }
        if let Some(value) = lookup("TV_RETRY_MAX_ATTEMPTS") {
            config.replica.retry.max_attempts = parse_number("TV_RETRY_MAX_ATTEMPTS", &value)?;
        }
        if let Some(dir) = lookup("TV_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if the server secret is the all-zero default.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.server_secret.iter().all(|b| *b == 0) {
            return Err(ConfigError::InsecureServerSecret);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "SECURITY VIOLATION: server secret is the default zero value. \
         Set the TV_SERVER_SECRET environment variable."
    )]
    InsecureServerSecret,

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

fn parse_secret(value: &str) -> Result<Zeroizing<[u8; SERVER_SECRET_LEN]>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        var: "TV_SERVER_SECRET",
        reason,
    };
    let bytes = Zeroizing::new(hex::decode(value.trim()).map_err(|e| invalid(e.to_string()))?);
    if bytes.len() != SERVER_SECRET_LEN {
        return Err(invalid(format!(
            "expected {SERVER_SECRET_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let mut secret = Zeroizing::new([0u8; SERVER_SECRET_LEN]);
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = parse_number(var, value)?;
    if millis == 0 {
        return Err(ConfigError::InvalidValue {
            var,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mode, OperatingMode::Normal);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.replica.retry.max_attempts, 5);
        assert!(config.data_dir.is_none());
        assert_eq!(
            config.validate_for_production(),
            Err(ConfigError::InsecureServerSecret)
        );
    }

    #[test]
    fn test_overrides() {
        let secret = "ab".repeat(SERVER_SECRET_LEN);
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TV_MODE", "Privacy"),
            ("TV_SERVER_SECRET", &secret),
            ("TV_CACHE_CAPACITY", "0"),
            ("TV_QUERY_TIMEOUT_MS", "250"),
            ("TV_SLOW_FILTER_MS", "20"),
            ("TV_RETRY_MAX_ATTEMPTS", "2"),
            ("TV_DATA_DIR", "/var/lib/tagvault"),
        ]))
        .unwrap();

        assert_eq!(config.mode, OperatingMode::Privacy);
        assert_eq!(config.server_secret[0], 0xab);
        assert_eq!(config.cache_capacity, 0);
        assert_eq!(config.query.timeout, Duration::from_millis(250));
        assert_eq!(config.filter.slow_threshold, Duration::from_millis(20));
        assert_eq!(config.replica.retry.max_attempts, 2);
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_unknown_mode_is_normal() {
        let config = RuntimeConfig::from_lookup(lookup(&[("TV_MODE", "stealth")])).unwrap();
        assert_eq!(config.mode, OperatingMode::Normal);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[("TV_SERVER_SECRET", "abcd")])),
            Err(ConfigError::InvalidValue { var: "TV_SERVER_SECRET", .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[("TV_SERVER_SECRET", "zz")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[("TV_QUERY_TIMEOUT_MS", "0")])),
            Err(ConfigError::InvalidValue { var: "TV_QUERY_TIMEOUT_MS", .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[("TV_CACHE_CAPACITY", "many")])),
            Err(ConfigError::InvalidValue { var: "TV_CACHE_CAPACITY", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = RuntimeConfig::from_lookup(lookup(&[(
            "TV_SERVER_SECRET",
            &"7f".repeat(SERVER_SECRET_LEN),
        )]))
        .unwrap();
        let printed = format!("{config:?}");
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("127"));
    }
}
