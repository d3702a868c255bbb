//! Connection Router

use std::sync::Arc;

use shared_types::{ConnectionType, OperatingMode};
use tracing::{debug, info, warn};

use crate::domain::{sanitize, ConnectionHandle, ConnectionParams, ModePolicyTable};
use crate::error::ConnectionError;
use crate::metrics::{RouterStats, RouterStatsSnapshot};
use crate::ports::ConnectionRouterApi;

pub struct ConnectionRouter {
    table: Arc<ModePolicyTable>,
    stats: Arc<RouterStats>,
}

impl ConnectionRouter {
    pub fn new(table: ModePolicyTable) -> Self {
        Self {
            table: Arc::new(table),
            stats: Arc::new(RouterStats::default()),
        }
    }

    pub fn table(&self) -> &ModePolicyTable {
        &self.table
    }
}

impl Default for ConnectionRouter {
    fn default() -> Self {
        Self::new(ModePolicyTable::default())
    }
}

impl ConnectionRouterApi for ConnectionRouter {
    fn resolve_connection(
        &self,
        mode: OperatingMode,
        params: ConnectionParams,
    ) -> Result<ConnectionHandle, ConnectionError> {
        if !self.table.has_entry(mode) {
            debug!(mode = %mode, "No policy for mode, using normal policy");
        }
        let policy = self.table.policy_for(mode);
        let sanitized = sanitize(policy, params);

        // Key names only; values may be credentials.
        if !sanitized.forbidden.is_empty() {
            warn!(mode = %mode, keys = ?sanitized.forbidden, "Dropped forbidden connection parameters");
        }
        if !sanitized.unknown.is_empty() {
            debug!(mode = %mode, keys = ?sanitized.unknown, "Dropped unrecognised connection parameters");
        }
        self.stats.record_dropped(sanitized.dropped());

        let url = match policy.connection_type {
            ConnectionType::Browser => None,
            connection_type => Some(policy.store_url.clone().ok_or(ConnectionError::MissingStoreUrl {
                mode,
                connection_type,
            })?),
        };

        let handle = ConnectionHandle::open(
            mode,
            policy.connection_type,
            url,
            sanitized.kept,
            Arc::clone(&self.stats),
        );
        debug!(
            handle_id = %handle.id(),
            mode = %mode,
            connection_type = %handle.connection_type(),
            "Connection resolved"
        );
        Ok(handle)
    }

    fn switch_mode(
        &self,
        existing: &ConnectionHandle,
        new_mode: OperatingMode,
        params: ConnectionParams,
    ) -> Result<ConnectionHandle, ConnectionError> {
        let closed = existing.close();
        info!(
            from = %existing.mode(),
            to = %new_mode,
            closed_previous = closed,
            "Switching operating mode"
        );
        self.resolve_connection(new_mode, params)
    }

    fn stats(&self) -> RouterStatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModePolicy;
    use shared_types::{Categorized, ErrorKind};
    use std::thread;

    fn params(pairs: &[(&str, &str)]) -> ConnectionParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_privacy_mode_never_gets_a_url() {
        let router = ConnectionRouter::default();
        let handle = router
            .resolve_connection(OperatingMode::Privacy, params(&[("url", "https://x")]))
            .unwrap();
        assert_eq!(handle.connection_type(), ConnectionType::Browser);
        assert!(handle.url().is_none());
        assert!(handle.param("url").is_none());
        assert_eq!(router.stats().params_dropped, 1);
        handle.close();
    }

    #[test]
    fn test_normal_and_dev_use_configured_urls() {
        let router = ConnectionRouter::new(ModePolicyTable::with_urls("file:a.db", "https://b"));
        let normal = router
            .resolve_connection(
                OperatingMode::Normal,
                params(&[("auth_token", "t"), ("user_id", "u1"), ("sync_url", "s")]),
            )
            .unwrap();
        assert_eq!(normal.connection_type(), ConnectionType::Server);
        assert_eq!(normal.url(), Some("https://b"));
        assert_eq!(normal.param("auth_token"), Some("t"));
        assert!(normal.param("sync_url").is_none());

        let dev = router
            .resolve_connection(OperatingMode::Dev, ConnectionParams::new())
            .unwrap();
        assert_eq!(dev.connection_type(), ConnectionType::Local);
        assert_eq!(dev.url(), Some("file:a.db"));
    }

    #[test]
    fn test_unrecognised_mode_string_routes_to_server() {
        let router = ConnectionRouter::default();
        let handle = router
            .resolve_connection_str("paranoid", ConnectionParams::new())
            .unwrap();
        assert_eq!(handle.mode(), OperatingMode::Normal);
        assert_eq!(handle.connection_type(), ConnectionType::Server);

        let privacy = router
            .resolve_connection_str(" PRIVACY ", ConnectionParams::new())
            .unwrap();
        assert_eq!(privacy.connection_type(), ConnectionType::Browser);
    }

    #[test]
    fn test_missing_store_url() {
        let router = ConnectionRouter::new(ModePolicyTable::new(ModePolicy::new(
            ConnectionType::Server,
            None,
        )));
        let err = router
            .resolve_connection(OperatingMode::Normal, ConnectionParams::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(router.stats().handles_opened, 0);
    }

    #[test]
    fn test_switch_mode_closes_previous() {
        let router = ConnectionRouter::default();
        let first = router
            .resolve_connection(OperatingMode::Normal, ConnectionParams::new())
            .unwrap();
        let second = router
            .switch_mode(&first, OperatingMode::Privacy, ConnectionParams::new())
            .unwrap();
        assert!(first.is_closed());
        assert!(!second.is_closed());
        assert_ne!(first.id(), second.id());

        // Switching from an already-closed handle is fine.
        let third = router
            .switch_mode(&first, OperatingMode::Dev, ConnectionParams::new())
            .unwrap();
        assert_eq!(third.connection_type(), ConnectionType::Local);
        assert_eq!(router.stats().handles_closed, 1);
    }

    #[test]
    fn test_concurrent_close_happens_once() {
        let router = ConnectionRouter::default();
        let handle = Arc::new(
            router
                .resolve_connection(OperatingMode::Normal, ConnectionParams::new())
                .unwrap(),
        );

        let closers: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || handle.close())
            })
            .collect();
        let performed = closers
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|closed| *closed)
            .count();

        assert_eq!(performed, 1);
        assert!(!handle.close());
        let stats = router.stats();
        assert_eq!(stats.handles_closed, 1);
        assert_eq!(stats.open_handles(), 0);
    }
}
