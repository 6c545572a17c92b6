//! The relationship engine

use chrono::Utc;
use kindred_core::{
    page_bounds, total_pages, ActorId, Batch, Config, Page, RelationKind, Result, Scope,
    SortedSetStore,
};

/// Relationship state-transition and query engine.
///
/// Every mutating operation is submitted to the store as one atomic batch,
/// so no observer ever sees a half-applied transition (a following edge
/// without its mirrored followers edge, for instance). Two racing calls on
/// the same pair resolve at the store level; the last writer's score wins,
/// which is an accepted, idempotent outcome.
pub struct Relationships<S> {
    store: S,
    config: Config,
}

impl<S: SortedSetStore> Relationships<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Establish a follow relationship from one id to another.
    ///
    /// No-op when the ids are equal, when the target has blocked the
    /// follower in this scope, or (pending mode) when the request already
    /// exists. In pending mode the relationship starts as a request that
    /// must be [`accept`](Self::accept)ed; otherwise the following/followers
    /// pair is written directly and reciprocity is derived.
    pub async fn follow(&self, from: &ActorId, to: &ActorId, scope: Option<&Scope>) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);
        if self.is_blocked(to, from, Some(scope)).await? {
            return Ok(());
        }

        if self.config.pending_follow {
            if self.is_pending(from, to, Some(scope)).await? {
                return Ok(());
            }
            let score = now_score();
            let mut batch = Batch::new();
            batch
                .add(self.key(RelationKind::Pending, scope, to), score, from.as_str())
                .add(
                    self.key(RelationKind::PendingWith, scope, from),
                    score,
                    to.as_str(),
                );
            self.store.apply(batch).await?;
            tracing::debug!("follow {} -> {} pending in scope {}", from, to, scope);
        } else {
            self.add_following_followers_reciprocated(from, to, scope)
                .await?;
            tracing::debug!("follow {} -> {} in scope {}", from, to, scope);
        }
        Ok(())
    }

    /// Remove a follow relationship, along with any reciprocated entries and
    /// any pending request in the same direction. Idempotent.
    pub async fn unfollow(
        &self,
        from: &ActorId,
        to: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);

        let mut batch = Batch::new();
        batch
            .remove(self.key(RelationKind::Following, scope, from), to.as_str())
            .remove(self.key(RelationKind::Followers, scope, to), from.as_str())
            .remove(self.key(RelationKind::Reciprocated, scope, from), to.as_str())
            .remove(self.key(RelationKind::Reciprocated, scope, to), from.as_str())
            .remove(self.key(RelationKind::Pending, scope, to), from.as_str())
            .remove(
                self.key(RelationKind::PendingWith, scope, from),
                to.as_str(),
            );
        self.store.apply(batch).await?;
        Ok(())
    }

    /// Block another id. Destroys any follow, reciprocated, or pending state
    /// between the pair in either direction, then records the block.
    /// Unconditional: it overrides any prior state, including a reverse
    /// follow.
    pub async fn block(&self, from: &ActorId, to: &ActorId, scope: Option<&Scope>) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);
        let score = now_score();

        let mut batch = Batch::new();
        batch
            .remove(self.key(RelationKind::Following, scope, from), to.as_str())
            .remove(self.key(RelationKind::Following, scope, to), from.as_str())
            .remove(self.key(RelationKind::Followers, scope, to), from.as_str())
            .remove(self.key(RelationKind::Followers, scope, from), to.as_str())
            .remove(self.key(RelationKind::Reciprocated, scope, from), to.as_str())
            .remove(self.key(RelationKind::Reciprocated, scope, to), from.as_str())
            .remove(self.key(RelationKind::Pending, scope, from), to.as_str())
            .remove(self.key(RelationKind::Pending, scope, to), from.as_str())
            .remove(
                self.key(RelationKind::PendingWith, scope, to),
                from.as_str(),
            )
            .remove(
                self.key(RelationKind::PendingWith, scope, from),
                to.as_str(),
            )
            .add(self.key(RelationKind::Blocked, scope, from), score, to.as_str())
            .add(
                self.key(RelationKind::BlockedBy, scope, to),
                score,
                from.as_str(),
            );
        self.store.apply(batch).await?;
        tracing::debug!("block {} -> {} in scope {}", from, to, scope);
        Ok(())
    }

    /// Remove a block. Idempotent.
    pub async fn unblock(&self, from: &ActorId, to: &ActorId, scope: Option<&Scope>) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);

        let mut batch = Batch::new();
        batch
            .remove(self.key(RelationKind::Blocked, scope, from), to.as_str())
            .remove(self.key(RelationKind::BlockedBy, scope, to), from.as_str());
        self.store.apply(batch).await?;
        Ok(())
    }

    /// Accept a pending follow request, converting it into a real
    /// following/followers pair (and a reciprocated pair if the reverse
    /// follow already exists).
    pub async fn accept(&self, from: &ActorId, to: &ActorId, scope: Option<&Scope>) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);
        self.add_following_followers_reciprocated(from, to, scope)
            .await
    }

    /// Deny a pending follow request, removing it without establishing
    /// anything. Idempotent.
    pub async fn deny(&self, from: &ActorId, to: &ActorId, scope: Option<&Scope>) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let scope = self.scope(scope);

        let mut batch = Batch::new();
        batch
            .remove(self.key(RelationKind::Pending, scope, to), from.as_str())
            .remove(
                self.key(RelationKind::PendingWith, scope, from),
                to.as_str(),
            );
        self.store.apply(batch).await?;
        Ok(())
    }

    /// Remove an id from every relationship universe it participates in,
    /// including the mirrored entry held by every counterpart. Prevents
    /// orphaned one-sided edges when an individual is deleted from the
    /// owning system.
    pub async fn clear(&self, id: &ActorId, scope: Option<&Scope>) -> Result<()> {
        const PAIRS: [(RelationKind, RelationKind); 7] = [
            (RelationKind::Following, RelationKind::Followers),
            (RelationKind::Followers, RelationKind::Following),
            (RelationKind::Reciprocated, RelationKind::Reciprocated),
            (RelationKind::BlockedBy, RelationKind::Blocked),
            (RelationKind::Blocked, RelationKind::BlockedBy),
            (RelationKind::PendingWith, RelationKind::Pending),
            (RelationKind::Pending, RelationKind::PendingWith),
        ];

        let scope = self.scope(scope);
        let mut batch = Batch::new();
        for (source, mirror) in PAIRS {
            let source_key = self.key(source, scope, id);
            let counterparts = self.store.range_desc(&source_key, 0, usize::MAX).await?;
            for counterpart in &counterparts {
                let counterpart = ActorId::from(counterpart);
                batch.remove(self.key(mirror, scope, &counterpart), id.as_str());
            }
            batch.delete(source_key);
        }
        self.store.apply(batch).await?;
        tracing::debug!("cleared {} in scope {}", id, scope);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read predicates
    // ─────────────────────────────────────────────────────────────────────────

    /// Is `id` following `other`?
    pub async fn is_following(
        &self,
        id: &ActorId,
        other: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::Following, id, other, scope)
            .await
    }

    /// Is `other` a follower of `id`?
    pub async fn is_follower(
        &self,
        id: &ActorId,
        other: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::Followers, id, other, scope)
            .await
    }

    /// Has `id` blocked `other`?
    pub async fn is_blocked(
        &self,
        id: &ActorId,
        other: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::Blocked, id, other, scope)
            .await
    }

    /// Is `id` blocked by `other`?
    pub async fn is_blocked_by(
        &self,
        id: &ActorId,
        other: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::BlockedBy, id, other, scope)
            .await
    }

    /// Do `from` and `to` follow each other? Computed from the two
    /// following collections, never cached.
    pub async fn is_reciprocated(
        &self,
        from: &ActorId,
        to: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        Ok(self.is_following(from, to, scope).await? && self.is_following(to, from, scope).await?)
    }

    /// Does `from` have a follow request awaiting `to`'s approval?
    pub async fn is_pending(
        &self,
        from: &ActorId,
        to: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::Pending, to, from, scope)
            .await
    }

    /// Is `to` waiting on an approval from `from`?
    pub async fn is_pending_with(
        &self,
        from: &ActorId,
        to: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        self.member_exists(RelationKind::PendingWith, to, from, scope)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listings
    // ─────────────────────────────────────────────────────────────────────────

    /// A page of ids that `id` is following, newest first.
    pub async fn following(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::Following, id, page, scope).await
    }

    /// A page of `id`'s followers, newest first.
    pub async fn followers(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::Followers, id, page, scope).await
    }

    /// A page of ids that `id` has blocked, newest first.
    pub async fn blocked(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::Blocked, id, page, scope).await
    }

    /// A page of ids blocking `id`, newest first.
    pub async fn blocked_by(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::BlockedBy, id, page, scope).await
    }

    /// A page of ids with a reciprocated follow with `id`, newest first.
    pub async fn reciprocated(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::Reciprocated, id, page, scope)
            .await
    }

    /// A page of ids whose follow requests await `id`'s approval.
    pub async fn pending(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::Pending, id, page, scope).await
    }

    /// A page of ids that `id` is waiting on for approval.
    pub async fn pending_with(
        &self,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        self.page_of(RelationKind::PendingWith, id, page, scope)
            .await
    }

    /// A page of one relationship collection for `id`.
    pub async fn page_of(
        &self,
        kind: RelationKind,
        id: &ActorId,
        page: Page,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        let scope = self.scope(scope);
        self.members(self.key(kind, scope, id), page).await
    }

    /// The entire collection of one kind for `id`, newest first.
    pub async fn all(
        &self,
        id: &ActorId,
        kind: RelationKind,
        scope: Option<&Scope>,
    ) -> Result<Vec<ActorId>> {
        let count = self.count(id, kind, scope).await?;
        if count == 0 {
            return Ok(Vec::new());
        }
        self.page_of(kind, id, Page::new(1).with_size(count), scope)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Counts
    // ─────────────────────────────────────────────────────────────────────────

    /// Cardinality of one relationship collection for `id`.
    pub async fn count(
        &self,
        id: &ActorId,
        kind: RelationKind,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        let scope = self.scope(scope);
        Ok(self.store.cardinality(&self.key(kind, scope, id)).await?)
    }

    /// Number of pages of one relationship collection for `id` at the given
    /// page size (`None` for the configured default).
    pub async fn page_count(
        &self,
        id: &ActorId,
        kind: RelationKind,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        let size = page_size.unwrap_or(self.config.page_size);
        Ok(total_pages(self.count(id, kind, scope).await?, size))
    }

    pub async fn following_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::Following, scope).await
    }

    pub async fn followers_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::Followers, scope).await
    }

    pub async fn blocked_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::Blocked, scope).await
    }

    pub async fn blocked_by_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::BlockedBy, scope).await
    }

    pub async fn reciprocated_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::Reciprocated, scope).await
    }

    pub async fn pending_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::Pending, scope).await
    }

    pub async fn pending_with_count(&self, id: &ActorId, scope: Option<&Scope>) -> Result<usize> {
        self.count(id, RelationKind::PendingWith, scope).await
    }

    pub async fn following_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::Following, page_size, scope)
            .await
    }

    pub async fn followers_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::Followers, page_size, scope)
            .await
    }

    pub async fn blocked_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::Blocked, page_size, scope)
            .await
    }

    pub async fn blocked_by_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::BlockedBy, page_size, scope)
            .await
    }

    pub async fn reciprocated_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::Reciprocated, page_size, scope)
            .await
    }

    pub async fn pending_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::Pending, page_size, scope)
            .await
    }

    pub async fn pending_with_page_count(
        &self,
        id: &ActorId,
        page_size: Option<usize>,
        scope: Option<&Scope>,
    ) -> Result<usize> {
        self.page_count(id, RelationKind::PendingWith, page_size, scope)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn scope<'a>(&'a self, scope: Option<&'a Scope>) -> &'a Scope {
        scope.unwrap_or(&self.config.default_scope)
    }

    fn key(&self, kind: RelationKind, scope: &Scope, owner: &ActorId) -> String {
        self.config.set_key(kind, scope, owner)
    }

    async fn member_exists(
        &self,
        kind: RelationKind,
        owner: &ActorId,
        member: &ActorId,
        scope: Option<&Scope>,
    ) -> Result<bool> {
        let scope = self.scope(scope);
        let score = self
            .store
            .score(&self.key(kind, scope, owner), member.as_str())
            .await?;
        Ok(score.is_some())
    }

    /// Write the following/followers pair, clear the matching pending
    /// request, then derive reciprocity. Shared by `follow` (pending mode
    /// off) and `accept`.
    async fn add_following_followers_reciprocated(
        &self,
        from: &ActorId,
        to: &ActorId,
        scope: &Scope,
    ) -> Result<()> {
        let score = now_score();
        let mut batch = Batch::new();
        batch
            .add(self.key(RelationKind::Following, scope, from), score, to.as_str())
            .add(self.key(RelationKind::Followers, scope, to), score, from.as_str())
            .remove(self.key(RelationKind::Pending, scope, to), from.as_str())
            .remove(
                self.key(RelationKind::PendingWith, scope, from),
                to.as_str(),
            );
        self.store.apply(batch).await?;

        if self.is_reciprocated(from, to, Some(scope)).await? {
            let mut batch = Batch::new();
            batch
                .add(self.key(RelationKind::Reciprocated, scope, from), score, to.as_str())
                .add(self.key(RelationKind::Reciprocated, scope, to), score, from.as_str());
            self.store.apply(batch).await?;
        }
        Ok(())
    }

    async fn members(&self, key: String, page: Page) -> Result<Vec<ActorId>> {
        let size = page.size.unwrap_or(self.config.page_size);
        let cardinality = self.store.cardinality(&key).await?;
        let (start, stop) = page_bounds(cardinality, page.number, size);
        let members = self.store.range_desc(&key, start, stop).await?;
        Ok(members.into_iter().map(ActorId::from).collect())
    }
}

fn now_score() -> f64 {
    Utc::now().timestamp() as f64
}
