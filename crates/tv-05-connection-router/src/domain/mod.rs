//! Domain Layer

pub mod handle;
pub mod params;
pub mod policy;

pub use handle::ConnectionHandle;
pub use params::{sanitize, ConnectionParams, SanitizedParams};
pub use policy::{ModePolicy, ModePolicyTable, DEFAULT_LOCAL_STORE_URL, DEFAULT_SERVER_STORE_URL};
