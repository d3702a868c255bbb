//! Inbound Ports (Driving Ports)

use shared_types::OperatingMode;

use crate::domain::{ConnectionHandle, ConnectionParams};
use crate::error::ConnectionError;
use crate::metrics::RouterStatsSnapshot;

pub trait ConnectionRouterApi: Send + Sync {
    /// Open a handle for `mode`, sanitizing `params` against its policy.
    /// Never fails because of parameters.
    fn resolve_connection(
        &self,
        mode: OperatingMode,
        params: ConnectionParams,
    ) -> Result<ConnectionHandle, ConnectionError>;

    /// Same as `resolve_connection` with a raw configuration value;
    /// unrecognised values select Normal.
    fn resolve_connection_str(
        &self,
        mode: &str,
        params: ConnectionParams,
    ) -> Result<ConnectionHandle, ConnectionError> {
        self.resolve_connection(OperatingMode::from_config_value(mode), params)
    }

    /// Close `existing`, then open a handle for `new_mode`.
    fn switch_mode(
        &self,
        existing: &ConnectionHandle,
        new_mode: OperatingMode,
        params: ConnectionParams,
    ) -> Result<ConnectionHandle, ConnectionError> {
        existing.close();
        self.resolve_connection(new_mode, params)
    }

    fn stats(&self) -> RouterStatsSnapshot;
}
