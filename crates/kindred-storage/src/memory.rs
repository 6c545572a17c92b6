//! In-memory sorted-set store

use async_trait::async_trait;
use kindred_core::{Batch, BatchOp, SortedSetStore, StoreError, StoreResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store backend
///
/// Each key holds a member-to-score map; ordering is derived at read time.
/// `apply` holds the write lock for the whole batch, so a compound
/// transition is observed all-or-nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: RwLock<HashMap<String, HashMap<String, f64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_op(sets: &mut HashMap<String, HashMap<String, f64>>, op: BatchOp) {
        match op {
            BatchOp::Add { key, score, member } => {
                sets.entry(key).or_default().insert(member, score);
            }
            BatchOp::Remove { key, member } => {
                if let Some(set) = sets.get_mut(&key) {
                    set.remove(&member);
                    if set.is_empty() {
                        sets.remove(&key);
                    }
                }
            }
            BatchOp::Delete { key } => {
                sets.remove(&key);
            }
        }
    }
}

#[async_trait]
impl SortedSetStore for MemoryStore {
    async fn add(&self, key: &str, score: f64, member: &str) -> StoreResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        Self::apply_op(
            &mut sets,
            BatchOp::Add {
                key: key.to_string(),
                score,
                member: member.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        Self::apply_op(
            &mut sets,
            BatchOp::Remove {
                key: key.to_string(),
                member: member.to_string(),
            },
        );
        Ok(())
    }

    async fn cardinality(&self, key: &str) -> StoreResult<usize> {
        let sets = self
            .sets
            .read()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        Ok(sets.get(key).map_or(0, HashMap::len))
    }

    async fn score(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        let sets = self
            .sets
            .read()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        Ok(sets.get(key).and_then(|set| set.get(member).copied()))
    }

    async fn range_desc(&self, key: &str, start: usize, stop: usize) -> StoreResult<Vec<String>> {
        let sets = self
            .sets
            .read()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(&String, f64)> = set.iter().map(|(m, s)| (m, *s)).collect();
        // Score descending; equal scores fall back to descending member
        // order, matching reverse-range semantics of ordered stores.
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.0.cmp(a.0))
        });

        if start >= entries.len() || stop < start {
            return Ok(Vec::new());
        }
        let stop = stop.min(entries.len() - 1);
        Ok(entries[start..=stop]
            .iter()
            .map(|(m, _)| (*m).clone())
            .collect())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        sets.remove(key);
        Ok(())
    }

    async fn apply(&self, batch: Batch) -> StoreResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|e| StoreError::Backend(format!("Lock error: {}", e)))?;
        for op in batch.into_ops() {
            Self::apply_op(&mut sets, op);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_score_remove() {
        let store = MemoryStore::new();
        store.add("k", 10.0, "a").await.unwrap();
        store.add("k", 20.0, "b").await.unwrap();

        assert_eq!(store.cardinality("k").await.unwrap(), 2);
        assert_eq!(store.score("k", "a").await.unwrap(), Some(10.0));
        assert_eq!(store.score("k", "missing").await.unwrap(), None);

        store.remove("k", "a").await.unwrap();
        assert_eq!(store.cardinality("k").await.unwrap(), 1);
        assert_eq!(store.score("k", "a").await.unwrap(), None);

        // removing an absent member is a no-op
        store.remove("k", "a").await.unwrap();
        assert_eq!(store.cardinality("k").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_refreshes_score() {
        let store = MemoryStore::new();
        store.add("k", 10.0, "a").await.unwrap();
        store.add("k", 30.0, "a").await.unwrap();

        assert_eq!(store.cardinality("k").await.unwrap(), 1);
        assert_eq!(store.score("k", "a").await.unwrap(), Some(30.0));
    }

    #[tokio::test]
    async fn test_range_desc_orders_by_score() {
        let store = MemoryStore::new();
        store.add("k", 1.0, "oldest").await.unwrap();
        store.add("k", 2.0, "middle").await.unwrap();
        store.add("k", 3.0, "newest").await.unwrap();

        let members = store.range_desc("k", 0, 2).await.unwrap();
        assert_eq!(members, vec!["newest", "middle", "oldest"]);

        let members = store.range_desc("k", 1, 1).await.unwrap();
        assert_eq!(members, vec!["middle"]);
    }

    #[tokio::test]
    async fn test_range_desc_breaks_ties_by_member() {
        let store = MemoryStore::new();
        store.add("k", 5.0, "11").await.unwrap();
        store.add("k", 5.0, "12").await.unwrap();

        let members = store.range_desc("k", 0, 1).await.unwrap();
        assert_eq!(members, vec!["12", "11"]);
    }

    #[tokio::test]
    async fn test_range_desc_clamps_bounds() {
        let store = MemoryStore::new();
        store.add("k", 1.0, "a").await.unwrap();
        store.add("k", 2.0, "b").await.unwrap();

        assert_eq!(store.range_desc("k", 0, 99).await.unwrap().len(), 2);
        assert!(store.range_desc("k", 5, 10).await.unwrap().is_empty());
        assert!(store.range_desc("missing", 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_drops_collection() {
        let store = MemoryStore::new();
        store.add("k", 1.0, "a").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.cardinality("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_apply_batch() {
        let store = MemoryStore::new();
        store.add("gone", 1.0, "x").await.unwrap();

        let mut batch = Batch::new();
        batch
            .add("k1", 1.0, "a")
            .add("k2", 2.0, "b")
            .remove("k1", "missing")
            .delete("gone");
        store.apply(batch).await.unwrap();

        assert_eq!(store.cardinality("k1").await.unwrap(), 1);
        assert_eq!(store.cardinality("k2").await.unwrap(), 1);
        assert_eq!(store.cardinality("gone").await.unwrap(), 0);
    }
}
