//! Service Layer

pub mod router;

pub use router::ConnectionRouter;
