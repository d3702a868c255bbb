//! Ports Layer
//!
//! - `BitmapFilterApi`: driving port
//! - `CardBitmapSource`: driven port supplying a tenant's card records

pub mod inbound;
pub mod outbound;

pub use inbound::BitmapFilterApi;
pub use outbound::CardBitmapSource;
