//! Kindred Core - Types and store contract for the relationship engine
//!
//! This crate provides the domain vocabulary (actors, scopes, relation
//! kinds), engine configuration, pagination arithmetic, and the ordered
//! associative store contract that backends implement.

pub mod actor;
pub mod config;
pub mod error;
pub mod kind;
pub mod page;
pub mod scope;
pub mod store;

pub use actor::ActorId;
pub use config::Config;
pub use error::{Error, Result};
pub use kind::RelationKind;
pub use page::{page_bounds, total_pages, Page};
pub use scope::Scope;
pub use store::{Batch, BatchOp, SortedSetStore, StoreError, StoreResult};
