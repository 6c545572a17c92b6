//! Kindred Relations - Relationship state-transition and query engine
//!
//! The [`Relationships`] engine owns every legal state transition
//! (follow/unfollow/block/unblock/accept/deny/clear), the read predicates,
//! paginated listings, counts, and the kind-dispatch façade. It is generic
//! over any `kindred_core::SortedSetStore` backend.

pub mod engine;

pub use engine::Relationships;
