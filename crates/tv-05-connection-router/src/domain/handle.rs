//! Connection handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared_types::{ConnectionType, OperatingMode};
use tracing::debug;
use uuid::Uuid;

use super::ConnectionParams;
use crate::metrics::RouterStats;

/// An open connection descriptor, owned by the caller.
///
/// Must be closed explicitly. `close` may be called any number of times from
/// any thread; only the first call performs the close.
#[derive(Debug)]
pub struct ConnectionHandle {
    id: Uuid,
    mode: OperatingMode,
    connection_type: ConnectionType,
    url: Option<String>,
    params: ConnectionParams,
    closed: AtomicBool,
    stats: Arc<RouterStats>,
}

impl ConnectionHandle {
    pub(crate) fn open(
        mode: OperatingMode,
        connection_type: ConnectionType,
        url: Option<String>,
        params: ConnectionParams,
        stats: Arc<RouterStats>,
    ) -> Self {
        stats.record_opened();
        Self {
            id: Uuid::new_v4(),
            mode,
            connection_type,
            url,
            params,
            closed: AtomicBool::new(false),
            stats,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns `true` if this call closed the handle.
    pub fn close(&self) -> bool {
        let performed = self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if performed {
            self.stats.record_closed();
            debug!(handle_id = %self.id, connection_type = %self.connection_type, "Connection closed");
        }
        performed
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if !self.is_closed() {
            debug!(handle_id = %self.id, "Connection handle dropped while open");
        }
    }
}
