//! # Service Container
//!
//! Holds every service instance and wires them together through their ports.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Set Algebra, Bitmap Filter, Connection Router (no dependencies)
//! Level 1: Bitmap Sync (store + filter card source)
//! Level 2: Replica Manager (backend + sink into Bitmap Sync)
//! Level 3: Query Router (everything above + content tiers)
//! ```
//!
//! ## Ownership
//!
//! - Every service is wrapped in `Arc` and shared with its dependents.
//! - Caches (obfuscation keys, replica handles, set algebra results) are
//!   fields of these instances; nothing is process-global.

use std::sync::Arc;

use shared_types::ConnectionType;
use tracing::info;

use tv_01_set_algebra::SetAlgebraService;
use tv_02_bitmap_filter::{BitmapFilterEngine, FilterHandler};
use tv_03_bitmap_sync::{BitmapSyncService, InMemoryBitmapStore, SyncHandler};
use tv_04_replica_manager::{InMemoryReplicaBackend, ReplicaBackend, ReplicaManager};
use tv_05_connection_router::{ConnectionRouter, ModePolicyTable};
use tv_06_query_router::{InMemoryContentTier, QueryHandler, QueryRouter};

use crate::adapters::BitmapSyncSink;
use crate::container::config::RuntimeConfig;

/// Bitmap sync service over the in-memory server store.
pub type ConcreteBitmapSyncService = BitmapSyncService<InMemoryBitmapStore>;

/// Central container holding all service instances.
pub struct ServiceContainer {
    pub config: RuntimeConfig,

    // =========================================================================
    // LEVEL 0: No dependencies
    // =========================================================================
    pub set_algebra: Arc<SetAlgebraService>,
    pub filter_engine: Arc<BitmapFilterEngine>,
    pub connections: Arc<ConnectionRouter>,

    // =========================================================================
    // LEVEL 1-2: Server tier intake and client replicas
    // =========================================================================
    pub bitmap_sync: Arc<ConcreteBitmapSyncService>,
    pub replicas: Arc<ReplicaManager>,

    // =========================================================================
    // LEVEL 3: Content tiers and query routing
    // =========================================================================
    pub browser_content: Arc<InMemoryContentTier>,
    pub server_content: Arc<InMemoryContentTier>,
    pub local_content: Arc<InMemoryContentTier>,
    pub query_router: Arc<QueryRouter>,
}

impl ServiceContainer {
    /// Container with in-memory replicas.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_replica_backend(config, Arc::new(InMemoryReplicaBackend::new()))
    }

    /// Create all services in dependency order.
    pub fn with_replica_backend(config: RuntimeConfig, backend: Arc<dyn ReplicaBackend>) -> Self {
        info!(mode = %config.mode, "Initializing TagVault service container");

        // Level 0
        let set_algebra = Arc::new(SetAlgebraService::with_cache_capacity(config.cache_capacity));
        let filter_engine = Arc::new(BitmapFilterEngine::with_config(config.filter.clone()));
        let connections = Arc::new(ConnectionRouter::new(ModePolicyTable::with_urls(
            config.local_store_url.clone(),
            config.server_store_url.clone(),
        )));
        info!(cache_capacity = config.cache_capacity, "Level 0 services initialized");

        // Level 1
        let bitmap_sync = Arc::new(BitmapSyncService::new(Arc::new(InMemoryBitmapStore::new())));

        // Level 2
        let replicas = Arc::new(
            ReplicaManager::new(config.server_secret.as_slice(), backend, config.replica.clone())
                .with_sink(Arc::new(BitmapSyncSink::new(Arc::clone(&bitmap_sync)))),
        );
        info!(
            creation_timeout_ms = config.replica.creation_timeout.as_millis() as u64,
            retry_attempts = config.replica.retry.max_attempts,
            "Replica manager initialized"
        );

        // Level 3
        let browser_content = Arc::new(InMemoryContentTier::new(ConnectionType::Browser));
        let server_content = Arc::new(
            InMemoryContentTier::new(ConnectionType::Server)
                .with_fingerprint_secret(config.server_secret.as_slice()),
        );
        let local_content = Arc::new(
            InMemoryContentTier::new(ConnectionType::Local)
                .with_fingerprint_secret(config.server_secret.as_slice()),
        );

        let query_router = Arc::new(
            QueryRouter::new(
                Arc::clone(&connections) as _,
                Arc::clone(&filter_engine) as _,
                Arc::clone(&bitmap_sync) as _,
                Arc::clone(&set_algebra) as _,
            )
            .with_config(config.query.clone())
            .with_tier(Arc::clone(&browser_content) as _)
            .with_tier(Arc::clone(&server_content) as _)
            .with_tier(Arc::clone(&local_content) as _),
        );
        info!("Query router initialized with browser, server and local tiers");

        Self {
            config,
            set_algebra,
            filter_engine,
            connections,
            bitmap_sync,
            replicas,
            browser_content,
            server_content,
            local_content,
            query_router,
        }
    }

    /// Create container for testing.
    pub fn new_for_testing() -> Self {
        Self::new(RuntimeConfig::default())
    }

    /// JSON intake for bitmap sync payloads.
    pub fn sync_handler(&self) -> SyncHandler<ConcreteBitmapSyncService> {
        SyncHandler::new(Arc::clone(&self.bitmap_sync))
    }

    /// JSON filter requests evaluated over the server bitmap store.
    pub fn filter_handler(&self) -> FilterHandler<BitmapFilterEngine> {
        FilterHandler::new(Arc::clone(&self.filter_engine), Arc::clone(&self.bitmap_sync) as _)
    }

    pub fn query_handler(&self) -> QueryHandler<QueryRouter> {
        QueryHandler::new(Arc::clone(&self.query_router))
    }
}
