//! Ordered associative store contract
//!
//! The engine keeps every relationship collection in a sorted set: members
//! are counterpart ids, scores are insertion timestamps. Backends implement
//! this trait; the engine never talks to a backend any other way.

use async_trait::async_trait;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store-specific error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Atomic batch rejected: {0}")]
    Batch(String),
}

/// A single mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    Add {
        key: String,
        score: f64,
        member: String,
    },
    Remove {
        key: String,
        member: String,
    },
    Delete {
        key: String,
    },
}

/// An all-or-nothing group of store mutations.
///
/// Compound state transitions (follow, block, clear, ...) queue their
/// sub-operations here and submit the whole group through
/// [`SortedSetStore::apply`], so no observer ever sees a half-applied
/// transition.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a member insertion (or score refresh).
    pub fn add(
        &mut self,
        key: impl Into<String>,
        score: f64,
        member: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(BatchOp::Add {
            key: key.into(),
            score,
            member: member.into(),
        });
        self
    }

    /// Queue a member removal. Removing an absent member is a no-op.
    pub fn remove(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.ops.push(BatchOp::Remove {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    /// Queue deletion of a whole collection.
    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(BatchOp::Delete { key: key.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Trait for ordered associative store backends
#[async_trait]
pub trait SortedSetStore: Send + Sync {
    /// Insert a member with the given score, or refresh its score.
    async fn add(&self, key: &str, score: f64, member: &str) -> StoreResult<()>;

    /// Remove a member. Absent members are ignored.
    async fn remove(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Number of members in the collection (0 for a missing key).
    async fn cardinality(&self, key: &str) -> StoreResult<usize>;

    /// Score of a member, or `None` if absent. Doubles as the existence test.
    async fn score(&self, key: &str, member: &str) -> StoreResult<Option<f64>>;

    /// Members ordered by descending score, within the inclusive index range
    /// `[start, stop]`. Out-of-range bounds are clamped; a start past the end
    /// yields an empty sequence.
    async fn range_desc(&self, key: &str, start: usize, stop: usize) -> StoreResult<Vec<String>>;

    /// Delete the whole collection.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Apply a batch of mutations as a single all-or-nothing unit.
    async fn apply(&self, batch: Batch) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_builder_queues_in_order() {
        let mut batch = Batch::new();
        batch
            .add("k1", 1.0, "a")
            .remove("k2", "b")
            .delete("k3");

        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.ops()[0],
            BatchOp::Add {
                key: "k1".to_string(),
                score: 1.0,
                member: "a".to_string()
            }
        );
        assert_eq!(
            batch.ops()[2],
            BatchOp::Delete {
                key: "k3".to_string()
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.into_ops(), Vec::new());
    }
}
