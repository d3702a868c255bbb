//! Process lifecycle: background workers and graceful shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapters::spawn_metrics_publisher;
use crate::container::ServiceContainer;

/// The TagVault runtime orchestrating all services.
pub struct TagVaultRuntime {
    container: Arc<ServiceContainer>,
    shutdown_tx: watch::Sender<bool>,
    started: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TagVaultRuntime {
    pub fn new(container: ServiceContainer) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            started: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
        }
    }

    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    /// Start the replica retry worker and the metrics publisher. Later
    /// calls are no-ops.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Runtime already started");
            return;
        }

        info!("===========================================");
        info!("  TagVault Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Mode: {}", self.container.config.mode);
        info!("===========================================");

        let mut workers = self.workers.lock();
        match self.container.replicas.spawn_retry_worker() {
            Some(worker) => workers.push(worker),
            None => warn!("Replica retry worker already running"),
        }
        workers.push(spawn_metrics_publisher(
            Arc::clone(&self.container),
            self.shutdown_tx.subscribe(),
        ));
        info!(workers = workers.len(), "Background workers started");
    }

    /// Graceful shutdown.
    ///
    /// 1. Signal shutdown to the workers and in-flight replica syncs
    /// 2. Wait for the workers to exit
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.shutdown_tx.send_replace(true);
        self.container.replicas.shutdown();

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                error!("Worker task failed: {}", e);
            }
        }
        info!("Shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_then_shutdown() {
        let runtime = TagVaultRuntime::new(ServiceContainer::new_for_testing());
        runtime.start();
        assert_eq!(runtime.workers.lock().len(), 2);

        runtime.start();
        assert_eq!(runtime.workers.lock().len(), 2);

        tokio::time::timeout(Duration::from_secs(2), runtime.shutdown())
            .await
            .unwrap();
        assert!(runtime.workers.lock().is_empty());
    }
}
