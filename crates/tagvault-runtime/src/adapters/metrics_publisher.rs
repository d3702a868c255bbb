//! # Metrics Publisher
//!
//! Copies service counter snapshots into the Prometheus gauges of
//! `tagvault-telemetry` on a fixed interval, and once more on shutdown.

use std::sync::Arc;

use tagvault_telemetry::metrics::{
    set_count, set_labeled, CACHE_HITS, CACHE_HIT_RATE, CACHE_MISSES, CACHE_SIZE,
    CONNECTIONS_OPEN, CONNECTION_PARAMS_DROPPED, FILTER_FOREIGN_DISCARDED, FILTER_OPERATIONS,
    FILTER_REJECTED, FILTER_SLOW, QUERIES, QUERY_FAILURES, REPLICAS_CREATED, REPLICA_RETRIES,
    REPLICA_SYNCS, RETRY_QUEUE_DEPTH, SYNC_ACCEPTED, SYNC_REJECTED,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tagvault_telemetry::log_component_event;
use tv_01_set_algebra::SetAlgebraApi;
use tv_02_bitmap_filter::BitmapFilterApi;
use tv_03_bitmap_sync::BitmapSyncApi;
use tv_05_connection_router::ConnectionRouterApi;
use tv_06_query_router::QueryRouterApi;

use crate::container::ServiceContainer;

/// Publish one snapshot of every service's counters.
pub fn publish_metrics(container: &ServiceContainer) {
    let filter = container.filter_engine.metrics();
    set_labeled(&FILTER_OPERATIONS, "match", filter.match_operations);
    set_labeled(&FILTER_OPERATIONS, "and", filter.and_operations);
    set_labeled(&FILTER_OPERATIONS, "or", filter.or_operations);
    set_labeled(&FILTER_OPERATIONS, "not", filter.not_operations);
    set_labeled(&FILTER_OPERATIONS, "complex", filter.complex_operations);
    set_count(&FILTER_REJECTED, filter.rejected_requests);
    set_count(&FILTER_FOREIGN_DISCARDED, filter.foreign_records_discarded);
    set_count(&FILTER_SLOW, filter.slow_operations);

    let sync = container.bitmap_sync.stats();
    set_labeled(&SYNC_ACCEPTED, "card", sync.cards_accepted);
    set_labeled(&SYNC_ACCEPTED, "tag", sync.tags_accepted);
    set_labeled(&SYNC_REJECTED, "privacy", sync.privacy_rejections);
    set_labeled(&SYNC_REJECTED, "validation", sync.validation_rejections);

    let replicas = container.replicas.metrics();
    set_count(&REPLICAS_CREATED, replicas.replicas_created);
    set_labeled(&REPLICA_SYNCS, "completed", replicas.syncs_completed);
    set_labeled(&REPLICA_SYNCS, "cancelled", replicas.syncs_cancelled);
    set_labeled(&REPLICA_RETRIES, "queued", replicas.retries_queued);
    set_labeled(&REPLICA_RETRIES, "succeeded", replicas.retries_succeeded);
    set_labeled(&REPLICA_RETRIES, "dropped", replicas.retries_dropped);
    set_count(&RETRY_QUEUE_DEPTH, replicas.retry_queue_depth);

    let queries = container.query_router.metrics();
    set_labeled(&QUERIES, "content", queries.content_queries);
    set_labeled(&QUERIES, "bitmap", queries.bitmap_queries);
    set_labeled(&QUERIES, "filtered", queries.filtered_queries);
    set_labeled(&QUERY_FAILURES, "any", queries.failed_queries);
    set_labeled(&QUERY_FAILURES, "isolation", queries.isolation_violations);
    set_labeled(&QUERY_FAILURES, "timeout", queries.timeouts);
    set_labeled(&QUERY_FAILURES, "unmatched", queries.unmatched_records_dropped);

    let connections = container.connections.stats();
    set_count(&CONNECTIONS_OPEN, connections.open_handles());
    set_count(&CONNECTION_PARAMS_DROPPED, connections.params_dropped);

    let cache = container.set_algebra.cache_statistics();
    set_count(&CACHE_HITS, cache.hits);
    set_count(&CACHE_MISSES, cache.misses);
    set_count(&CACHE_SIZE, cache.size as u64);
    CACHE_HIT_RATE.set(cache.hit_rate);
}

/// Publish every `metrics_interval` until `shutdown` reads `true`.
pub fn spawn_metrics_publisher(
    container: Arc<ServiceContainer>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = container.config.metrics_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => publish_metrics(&container),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        publish_metrics(&container);
                        break;
                    }
                }
            }
        }
        log_component_event!(debug, "metrics-publisher", "Metrics publisher stopped");
    })
}
