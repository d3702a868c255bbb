//! # Storage Adapters
//!
//! Production replica storage. Tests and default builds use
//! `InMemoryReplicaBackend` from tv-04 instead.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_replica;

#[cfg(feature = "rocksdb")]
pub use rocksdb_replica::{RocksDbReplicaBackend, RocksDbReplicaConfig};
