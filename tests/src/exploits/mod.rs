//! # Exploit Simulations
//!
//! Attempts to push content past the privacy boundary or to read across
//! tenants. Each one must be refused without storing or returning anything.

pub mod content_smuggling;
pub mod leaky_tier;
pub mod parameter_injection;
