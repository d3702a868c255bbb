//! Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::ReplicaManagerApi;
pub use outbound::{ReplicaBackend, RowWrite, ServerBitmapSink};
