//! Handler Layer
//!
//! JSON entry point for filter requests arriving from the client tier.

pub mod json_handler;

pub use json_handler::{FilterHandler, FilterRequestWire};
