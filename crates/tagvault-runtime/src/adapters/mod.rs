//! # Adapters
//!
//! Implementations of service ports that cross service boundaries:
//!
//! - `bitmap_sink`: replica manager → bitmap sync (`ServerBitmapSink`)
//! - `storage`: RocksDB `ReplicaBackend` (feature `rocksdb`)
//! - `metrics_publisher`: service counters → Prometheus gauges

pub mod bitmap_sink;
pub mod metrics_publisher;
pub mod storage;

pub use bitmap_sink::BitmapSyncSink;
pub use metrics_publisher::{publish_metrics, spawn_metrics_publisher};
