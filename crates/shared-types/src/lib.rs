//! # Shared Types Crate
//!
//! Cross-subsystem types for TagVault.
//!
//! ## Design Principles
//!
//! - **Tenant First**: every bitmap record carries exactly one [`TenantKey`];
//!   nothing is evaluated against a record of another tenant.
//! - **Opaque Server Data**: [`CardBitmapRecord`], [`TagBitmapRecord`] and
//!   [`FilterResult`] have no content fields. Content lives only in
//!   [`CardContent`] / [`TagContent`], which never cross to the server tier.
//! - **One Taxonomy**: every subsystem error maps onto [`ErrorKind`].

pub mod entities;
pub mod errors;
pub mod ipc;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
pub use security::*;
