//! Adapters Layer
//!
//! - `memory`: in-memory `BitmapStore`
//! - `filter_source`: exposes stored card bitmaps to the filter engine

pub mod filter_source;
pub mod memory;

pub use memory::InMemoryBitmapStore;
