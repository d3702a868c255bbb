//! # TagVault Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared tenants, cards and containers
//! ├── integration/      # Cross-service flows through the runtime container
//! └── exploits/         # Attempts to move content or data across boundaries
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tv-tests
//!
//! # By category
//! cargo test -p tv-tests integration::
//! cargo test -p tv-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p tv-tests
//! ```

pub mod exploits;
#[cfg(test)]
pub mod fixtures;
pub mod integration;
