//! # Integration Flows
//!
//! End-to-end paths through the runtime's service container:
//!
//! - `privacy_mode`: browser snapshot → replica → bitmap sync → filter →
//!   browser content
//! - `mode_routing`: tier selection and connection handling per mode
//! - `tenant_isolation`: two tenants sharing tag ids and bitmaps
//! - `replica_retry`: offline replica backend, retry worker, recovery

pub mod mode_routing;
pub mod privacy_mode;
pub mod replica_retry;
pub mod tenant_isolation;
