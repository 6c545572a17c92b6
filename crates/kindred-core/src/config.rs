//! Engine configuration

use crate::actor::ActorId;
use crate::kind::RelationKind;
use crate::scope::Scope;
use serde::{Deserialize, Serialize};

/// Configuration for the relationship engine.
///
/// An explicit value passed to the engine constructor; two engines with
/// different configurations never observe each other's collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix for every collection key.
    pub namespace: String,

    /// Collection name for who an individual is following.
    pub following_key: String,

    /// Collection name for the followers of an individual.
    pub followers_key: String,

    /// Collection name for who an individual blocks.
    pub blocked_key: String,

    /// Collection name for who is blocking an individual.
    pub blocked_by_key: String,

    /// Collection name for reciprocated follows.
    pub reciprocated_key: String,

    /// Collection name for follow requests awaiting an individual's approval.
    pub pending_key: String,

    /// Collection name for follow requests an individual is waiting on.
    pub pending_with_key: String,

    /// Scope used when a call does not name one.
    pub default_scope: Scope,

    /// When true, `follow` creates a pending request that must be accepted
    /// before any following/followers edge exists.
    pub pending_follow: bool,

    /// Page size used when a page request does not name one.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "kindred".to_string(),
            following_key: RelationKind::Following.as_str().to_string(),
            followers_key: RelationKind::Followers.as_str().to_string(),
            blocked_key: RelationKind::Blocked.as_str().to_string(),
            blocked_by_key: RelationKind::BlockedBy.as_str().to_string(),
            reciprocated_key: RelationKind::Reciprocated.as_str().to_string(),
            pending_key: RelationKind::Pending.as_str().to_string(),
            pending_with_key: RelationKind::PendingWith.as_str().to_string(),
            default_scope: Scope::default(),
            pending_follow: false,
            page_size: 25,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.default_scope = scope.into();
        self
    }

    pub fn with_pending_follow(mut self, enabled: bool) -> Self {
        self.pending_follow = enabled;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the collection name for one relation kind.
    pub fn with_kind_key(mut self, kind: RelationKind, name: impl Into<String>) -> Self {
        let name = name.into();
        match kind {
            RelationKind::Following => self.following_key = name,
            RelationKind::Followers => self.followers_key = name,
            RelationKind::Blocked => self.blocked_key = name,
            RelationKind::BlockedBy => self.blocked_by_key = name,
            RelationKind::Reciprocated => self.reciprocated_key = name,
            RelationKind::Pending => self.pending_key = name,
            RelationKind::PendingWith => self.pending_with_key = name,
        }
        self
    }

    /// Collection name configured for a relation kind.
    pub fn kind_key(&self, kind: RelationKind) -> &str {
        match kind {
            RelationKind::Following => &self.following_key,
            RelationKind::Followers => &self.followers_key,
            RelationKind::Blocked => &self.blocked_key,
            RelationKind::BlockedBy => &self.blocked_by_key,
            RelationKind::Reciprocated => &self.reciprocated_key,
            RelationKind::Pending => &self.pending_key,
            RelationKind::PendingWith => &self.pending_with_key,
        }
    }

    /// Full store key for one owner's collection:
    /// `namespace:kind:scope:owner`.
    pub fn set_key(&self, kind: RelationKind, scope: &Scope, owner: &ActorId) -> String {
        format!(
            "{}:{}:{}:{}",
            self.namespace,
            self.kind_key(kind),
            scope,
            owner
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.namespace, "kindred");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.default_scope, Scope::from("default"));
        assert!(!config.pending_follow);
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_namespace("graph")
            .with_default_scope("friends")
            .with_pending_follow(true)
            .with_page_size(10);

        assert_eq!(config.namespace, "graph");
        assert_eq!(config.default_scope, Scope::from("friends"));
        assert!(config.pending_follow);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_set_key_composition() {
        let config = Config::default();
        let key = config.set_key(
            RelationKind::Following,
            &Scope::from("work"),
            &ActorId::from(1u64),
        );
        assert_eq!(key, "kindred:following:work:1");
    }

    #[test]
    fn test_kind_key_override() {
        let config = Config::new().with_kind_key(RelationKind::Blocked, "denylist");
        assert_eq!(config.kind_key(RelationKind::Blocked), "denylist");
        assert_eq!(config.kind_key(RelationKind::BlockedBy), "blocked_by");
    }
}
