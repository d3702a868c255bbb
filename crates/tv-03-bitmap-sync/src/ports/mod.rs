//! Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::BitmapSyncApi;
pub use outbound::BitmapStore;
