//! Service Layer

pub mod manager;

pub use manager::ReplicaManager;
