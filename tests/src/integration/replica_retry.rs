//! # Replica Retry
//!
//! Syncs that fail on connectivity are queued, retried by the runtime's
//! worker with backoff, and land in the server store once the backend
//! recovers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shared_types::OperatingMode;
    use tagvault_runtime::{ServiceContainer, TagVaultRuntime};
    use tv_03_bitmap_sync::BitmapSyncApi;
    use tv_04_replica_manager::{BrowserSnapshot, InMemoryReplicaBackend, ReplicaManagerApi};

    use crate::fixtures::{config, scenario_cards, tenant};

    async fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_offline_sync_is_retried_after_recovery() {
        let backend = Arc::new(InMemoryReplicaBackend::new());
        let runtime = TagVaultRuntime::new(ServiceContainer::with_replica_backend(
            config(OperatingMode::Privacy),
            backend.clone(),
        ));
        runtime.start();
        let container = Arc::clone(runtime.container());
        let u1 = tenant("u1");

        backend.set_offline(true);
        let summary = container
            .replicas
            .sync_browser_to_server(
                &u1,
                BrowserSnapshot {
                    cards: scenario_cards(&u1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(summary.queued_for_retry);
        assert!(container.bitmap_sync.query_bitmaps(&u1).unwrap().is_empty());

        backend.set_offline(false);
        let synced = wait_for(|| {
            container
                .bitmap_sync
                .query_bitmaps(&u1)
                .map(|s| s.cards.len() == 3)
                .unwrap_or(false)
        })
        .await;
        assert!(synced);
        assert!(wait_for(|| container.replicas.metrics().retries_succeeded == 1).await);
        assert_eq!(container.replicas.metrics().retry_queue_depth, 0);
        assert_eq!(backend.creations(), 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_job_is_dropped_after_max_attempts() {
        let backend = Arc::new(InMemoryReplicaBackend::new());
        let mut config = config(OperatingMode::Privacy);
        config.replica.retry.max_attempts = 2;
        let runtime = TagVaultRuntime::new(ServiceContainer::with_replica_backend(config, backend.clone()));
        runtime.start();
        let container = Arc::clone(runtime.container());
        let u1 = tenant("u1");

        backend.set_offline(true);
        let summary = container
            .replicas
            .sync_browser_to_server(
                &u1,
                BrowserSnapshot {
                    cards: scenario_cards(&u1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(summary.queued_for_retry);

        assert!(wait_for(|| container.replicas.metrics().retries_dropped == 1).await);
        assert_eq!(container.replicas.metrics().retry_queue_depth, 0);
        assert!(container.bitmap_sync.query_bitmaps(&u1).unwrap().is_empty());

        runtime.shutdown().await;
    }
}
