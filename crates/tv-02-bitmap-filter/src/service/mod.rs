//! Service Layer

pub mod filter_engine;

pub use filter_engine::BitmapFilterEngine;
