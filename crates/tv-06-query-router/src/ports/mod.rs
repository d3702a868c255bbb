//! Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::QueryRouterApi;
pub use outbound::ContentTier;
