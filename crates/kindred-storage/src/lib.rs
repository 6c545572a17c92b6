//! Kindred Storage - Store backends for the relationship engine
//!
//! Backends implement `kindred_core::SortedSetStore`. The in-memory backend
//! here is the reference implementation; production deployments plug in a
//! client for whatever ordered store they run.

pub mod memory;

pub use memory::MemoryStore;
