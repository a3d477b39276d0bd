//! Document store adapter.
//!
//! All durable state lives in an external document store. The store is
//! consumed through [`DocumentStore`], an explicitly threaded handle, so
//! every component can be exercised against a substitute backend. The
//! in-process [`memory::MemoryStore`] backend ships with the service;
//! managed-database adapters implement the same trait.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

use crate::cursor::{SortKey, SortKeyKind};
use crate::models::{Community, MembershipAction, Post, User};

/// Store-imposed cap on `in`-style batch lookups. Callers must partition
/// larger id sets into chunks of at most this many operands.
pub const MAX_ID_BATCH: usize = 30;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Transaction could not commit within the store's retry budget.
    /// Safe to retry: every operation surfacing this is idempotent.
    #[error("transaction contention: {0}")]
    Contention(String),

    #[error("store i/o error: {0}")]
    Io(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Total orderings a feed query can ask the store to apply. Each maps a
/// post to a primary sort key and breaks ties on creation time; the
/// cursor predicate only ever sees the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrdering {
    /// Creation time, newest first
    CreatedDesc,
    /// Peak hotness score descending, creation time as tie-break
    HotnessCreatedDesc,
    /// Like count descending, creation time as tie-break
    LikesCreatedDesc,
}

impl PostOrdering {
    pub fn primary_key(&self, post: &Post) -> SortKey {
        match self {
            PostOrdering::CreatedDesc => SortKey::Timestamp(post.created_at_millis()),
            PostOrdering::HotnessCreatedDesc => SortKey::Score(post.peak_hotness_score),
            PostOrdering::LikesCreatedDesc => SortKey::Count(post.likes_count),
        }
    }

    pub fn key_kind(&self) -> SortKeyKind {
        match self {
            PostOrdering::CreatedDesc => SortKeyKind::Timestamp,
            PostOrdering::HotnessCreatedDesc => SortKeyKind::Score,
            PostOrdering::LikesCreatedDesc => SortKeyKind::Count,
        }
    }

    /// Result ordering: descending on the primary key, then descending on
    /// creation time.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let by_key = self.primary_key(b).compare(&self.primary_key(a));
        by_key.then_with(|| b.created_at.cmp(&a.created_at))
    }

    /// Strict resume-after predicate: a post belongs to the next page only
    /// when its primary key is strictly below the cursor position. Ties at
    /// the page boundary are skipped, since the cursor does not capture
    /// the tie-break component.
    pub fn resumes_after(&self, post: &Post, after: &SortKey) -> bool {
        self.primary_key(post).compare(after) == Ordering::Less
    }
}

/// An ordered, filtered, cursor-resumable query over the post collection,
/// produced by the feed query planner and executed by the adapter.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// Restrict to one community; `None` means global scope
    pub community_id: Option<String>,
    pub ordering: PostOrdering,
    /// Resume strictly after this position in the primary sort key
    pub after: Option<SortKey>,
    /// Hard page cap, already clamped by the planner
    pub limit: usize,
}

/// The membership read-modify-write, carried as a single transactional
/// operation so the counter invariant stays enforceable regardless of how
/// a backend commits it (optimistic retry loop or a native multi-document
/// transaction).
#[derive(Debug, Clone)]
pub struct MembershipToggle {
    pub user_id: String,
    pub community_id: String,
    pub action: MembershipAction,
}

impl MembershipToggle {
    /// Idempotent transition table for the (user, community) state
    /// machine: `Some(delta)` when a state change must be applied, `None`
    /// when the pair is already in the target state.
    pub fn counter_delta(&self, is_member: bool) -> Option<i64> {
        match (self.action, is_member) {
            (MembershipAction::Join, false) => Some(1),
            (MembershipAction::Leave, true) => Some(-1),
            _ => None,
        }
    }
}

/// Acknowledgment returned by a committed membership transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipOutcome {
    pub action: MembershipAction,
    /// False when the toggle was an idempotent no-op
    pub applied: bool,
    pub member_count: i64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    /// Batch lookup by id; at most [`MAX_ID_BATCH`] ids per call.
    async fn get_users_by_ids(&self, user_ids: &[String]) -> StoreResult<Vec<User>>;

    async fn get_community(&self, community_id: &str) -> StoreResult<Option<Community>>;

    /// Fails with `AlreadyExists` when the community id is taken.
    async fn insert_community(&self, community: Community) -> StoreResult<()>;

    async fn insert_post(&self, post: Post) -> StoreResult<()>;

    async fn query_posts(&self, query: &PostQuery) -> StoreResult<Vec<Post>>;

    /// Execute the membership toggle atomically: the joined-set mutation
    /// and the counter delta commit together or not at all. Missing user
    /// or community records fail with `NotFound` and no mutation.
    async fn apply_membership(&self, toggle: &MembershipToggle) -> StoreResult<MembershipOutcome>;
}
