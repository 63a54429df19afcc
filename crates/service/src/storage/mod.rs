//! Storage abstractions for service layer
//!
//! Contains the lock-guarded in-memory store shared by the entity services,
//! plus the record trait that lets it implement soft delete generically.

pub mod memory_store;

pub use memory_store::{MemoryStore, Record};
