//! # TagVault
//!
//! Entry point for the TagVault service. See the library docs for the
//! startup sequence and `RuntimeConfig` for the environment variables.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared_types::OperatingMode;
use tagvault_runtime::{RuntimeConfig, ServiceContainer, TagVaultRuntime};
use tagvault_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};
use tv_04_replica_manager::ReplicaBackend;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid configuration")?;
    if let Err(e) = config.validate_for_production() {
        if config.mode != OperatingMode::Dev {
            return Err(e).context("Refusing to start");
        }
        warn!("{}", e);
    }

    let backend = replica_backend(&config)?;
    let runtime = TagVaultRuntime::new(ServiceContainer::with_replica_backend(config, backend));
    runtime.start();

    info!("TagVault is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}

#[cfg(feature = "rocksdb")]
fn replica_backend(config: &RuntimeConfig) -> Result<Arc<dyn ReplicaBackend>> {
    use tagvault_runtime::adapters::storage::{RocksDbReplicaBackend, RocksDbReplicaConfig};
    use tv_04_replica_manager::InMemoryReplicaBackend;

    match &config.data_dir {
        Some(dir) => {
            let backend = RocksDbReplicaBackend::open(RocksDbReplicaConfig::new(dir))
                .context("Failed to open replica store")?;
            Ok(Arc::new(backend))
        }
        None => {
            warn!("TV_DATA_DIR not set, replicas are kept in memory");
            Ok(Arc::new(InMemoryReplicaBackend::new()))
        }
    }
}

#[cfg(not(feature = "rocksdb"))]
fn replica_backend(config: &RuntimeConfig) -> Result<Arc<dyn ReplicaBackend>> {
    use tv_04_replica_manager::InMemoryReplicaBackend;

    if config.data_dir.is_some() {
        warn!("TV_DATA_DIR ignored: built without the rocksdb feature");
    }
    Ok(Arc::new(InMemoryReplicaBackend::new()))
}
