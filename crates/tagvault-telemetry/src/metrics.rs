//! Prometheus metrics for TagVault.
//!
//! Services keep their own atomic counters; the runtime copies their
//! snapshots into these gauges on a fixed interval. Names follow
//! `tv_<component>_<metric>`.

use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BITMAP FILTER
    // =========================================================================

    /// Filter calls by operation kind
    pub static ref FILTER_OPERATIONS: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_filter_operations_total", "Bitmap filter calls by operation"),
        &["kind"]  // kind: match/and/or/not/complex
    ).expect("metric creation failed");

    pub static ref FILTER_REJECTED: IntGauge = IntGauge::new(
        "tv_filter_rejected_total",
        "Filter requests rejected by validation"
    ).expect("metric creation failed");

    /// Foreign-tenant records discarded before evaluation
    pub static ref FILTER_FOREIGN_DISCARDED: IntGauge = IntGauge::new(
        "tv_filter_foreign_records_discarded_total",
        "Records of another tenant dropped before evaluation"
    ).expect("metric creation failed");

    pub static ref FILTER_SLOW: IntGauge = IntGauge::new(
        "tv_filter_slow_operations_total",
        "Filter calls slower than the configured threshold"
    ).expect("metric creation failed");

    // =========================================================================
    // BITMAP SYNC
    // =========================================================================

    pub static ref SYNC_ACCEPTED: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_sync_accepted_total", "Bitmap payloads stored"),
        &["record"]  // record: card/tag
    ).expect("metric creation failed");

    /// Rejected payloads, privacy violations split out for alerting
    pub static ref SYNC_REJECTED: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_sync_rejected_total", "Bitmap payloads rejected"),
        &["reason"]  // reason: privacy/validation
    ).expect("metric creation failed");

    // =========================================================================
    // REPLICAS
    // =========================================================================

    pub static ref REPLICAS_CREATED: IntGauge = IntGauge::new(
        "tv_replicas_created_total",
        "Per-tenant replicas provisioned"
    ).expect("metric creation failed");

    pub static ref REPLICA_SYNCS: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_replica_syncs_total", "Browser to server syncs"),
        &["outcome"]  // outcome: completed/cancelled
    ).expect("metric creation failed");

    pub static ref REPLICA_RETRIES: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_replica_retries_total", "Deferred sync jobs"),
        &["outcome"]  // outcome: queued/succeeded/dropped
    ).expect("metric creation failed");

    pub static ref RETRY_QUEUE_DEPTH: IntGauge = IntGauge::new(
        "tv_replica_retry_queue_depth",
        "Sync jobs waiting for or running a retry"
    ).expect("metric creation failed");

    // =========================================================================
    // ROUTING
    // =========================================================================

    pub static ref QUERIES: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_queries_total", "Routed queries"),
        &["route"]  // route: content/bitmap/filtered
    ).expect("metric creation failed");

    pub static ref QUERY_FAILURES: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tv_query_failures_total", "Failed routed queries"),
        &["reason"]  // reason: any/isolation/timeout/unmatched
    ).expect("metric creation failed");

    pub static ref CONNECTIONS_OPEN: IntGauge = IntGauge::new(
        "tv_connections_open",
        "Connection handles opened and not yet closed"
    ).expect("metric creation failed");

    pub static ref CONNECTION_PARAMS_DROPPED: IntGauge = IntGauge::new(
        "tv_connection_params_dropped_total",
        "Connection parameters removed by mode policy"
    ).expect("metric creation failed");

    // =========================================================================
    // SET ALGEBRA CACHE
    // =========================================================================

    pub static ref CACHE_HITS: IntGauge = IntGauge::new(
        "tv_cache_hits_total",
        "Set algebra cache hits"
    ).expect("metric creation failed");

    pub static ref CACHE_MISSES: IntGauge = IntGauge::new(
        "tv_cache_misses_total",
        "Set algebra cache misses"
    ).expect("metric creation failed");

    pub static ref CACHE_SIZE: IntGauge = IntGauge::new(
        "tv_cache_entries",
        "Entries held by the set algebra cache"
    ).expect("metric creation failed");

    pub static ref CACHE_HIT_RATE: Gauge = Gauge::new(
        "tv_cache_hit_rate",
        "Hits over lookups since the last clear"
    ).expect("metric creation failed");
}

/// Register every metric with [`REGISTRY`]. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Filter
        Box::new(FILTER_OPERATIONS.clone()),
        Box::new(FILTER_REJECTED.clone()),
        Box::new(FILTER_FOREIGN_DISCARDED.clone()),
        Box::new(FILTER_SLOW.clone()),
        // Sync
        Box::new(SYNC_ACCEPTED.clone()),
        Box::new(SYNC_REJECTED.clone()),
        // Replicas
        Box::new(REPLICAS_CREATED.clone()),
        Box::new(REPLICA_SYNCS.clone()),
        Box::new(REPLICA_RETRIES.clone()),
        Box::new(RETRY_QUEUE_DEPTH.clone()),
        // Routing
        Box::new(QUERIES.clone()),
        Box::new(QUERY_FAILURES.clone()),
        Box::new(CONNECTIONS_OPEN.clone()),
        Box::new(CONNECTION_PARAMS_DROPPED.clone()),
        // Cache
        Box::new(CACHE_HITS.clone()),
        Box::new(CACHE_MISSES.clone()),
        Box::new(CACHE_SIZE.clone()),
        Box::new(CACHE_HIT_RATE.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Set a labelled gauge from a `u64` counter value.
pub fn set_labeled(gauge: &IntGaugeVec, label: &str, value: u64) {
    gauge
        .with_label_values(&[label])
        .set(i64::try_from(value).unwrap_or(i64::MAX));
}

/// Set a gauge from a `u64` counter value.
pub fn set_count(gauge: &IntGauge, value: u64) {
    gauge.set(i64::try_from(value).unwrap_or(i64::MAX));
}
