//! In-process document store backend.
//!
//! Documents touched by transactions carry a version stamp; the
//! membership toggle commits through an optimistic-concurrency loop that
//! re-reads and re-validates both records before applying the paired
//! writes inside one critical section. This mirrors the commit protocol
//! a managed document database runs server-side, so the service and its
//! tests exercise the same contention and retry paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use super::{
    DocumentStore, MembershipOutcome, MembershipToggle, PostQuery, StoreError, StoreResult,
    MAX_ID_BATCH,
};
use crate::models::{Community, Post, User};

/// Commit attempts before a contended transaction is surfaced as
/// retryable to the caller.
const TXN_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct Versioned<T> {
    doc: T,
    version: u64,
}

impl<T> Versioned<T> {
    fn new(doc: T) -> Self {
        Self { doc, version: 0 }
    }
}

#[derive(Default)]
struct Collections {
    users: HashMap<String, Versioned<User>>,
    communities: HashMap<String, Versioned<Community>>,
    posts: HashMap<String, Post>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user profile. Profile creation belongs to the external
    /// auth collaborator, so it is not part of the store trait.
    pub fn put_user(&self, user: User) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.users.insert(user.id.clone(), Versioned::new(user));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.users.get(user_id).map(|v| v.doc.clone()))
    }

    async fn get_users_by_ids(&self, user_ids: &[String]) -> StoreResult<Vec<User>> {
        if user_ids.len() > MAX_ID_BATCH {
            return Err(StoreError::Io(format!(
                "batch lookup of {} ids exceeds store limit of {}",
                user_ids.len(),
                MAX_ID_BATCH
            )));
        }

        let inner = self.inner.read().expect("store lock poisoned");
        Ok(user_ids
            .iter()
            .filter_map(|id| inner.users.get(id).map(|v| v.doc.clone()))
            .collect())
    }

    async fn get_community(&self, community_id: &str) -> StoreResult<Option<Community>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.communities.get(community_id).map(|v| v.doc.clone()))
    }

    async fn insert_community(&self, community: Community) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.communities.contains_key(&community.id) {
            return Err(StoreError::AlreadyExists(format!(
                "community {}",
                community.id
            )));
        }
        inner
            .communities
            .insert(community.id.clone(), Versioned::new(community));
        Ok(())
    }

    async fn insert_post(&self, post: Post) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.posts.contains_key(&post.id) {
            return Err(StoreError::AlreadyExists(format!("post {}", post.id)));
        }
        inner.posts.insert(post.id.clone(), post);
        Ok(())
    }

    async fn query_posts(&self, query: &PostQuery) -> StoreResult<Vec<Post>> {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut page: Vec<Post> = inner
            .posts
            .values()
            .filter(|post| match &query.community_id {
                Some(id) => &post.community_id == id,
                None => true,
            })
            .filter(|post| match &query.after {
                Some(after) => query.ordering.resumes_after(post, after),
                None => true,
            })
            .cloned()
            .collect();

        page.sort_by(|a, b| query.ordering.compare(a, b));
        page.truncate(query.limit);
        Ok(page)
    }

    async fn apply_membership(&self, toggle: &MembershipToggle) -> StoreResult<MembershipOutcome> {
        for attempt in 0..TXN_MAX_ATTEMPTS {
            // Read phase: snapshot both records with their versions.
            let (user_snapshot, community_snapshot) = {
                let inner = self.inner.read().expect("store lock poisoned");
                let user = inner
                    .users
                    .get(&toggle.user_id)
                    .ok_or_else(|| StoreError::NotFound(format!("user {}", toggle.user_id)))?;
                let community = inner.communities.get(&toggle.community_id).ok_or_else(|| {
                    StoreError::NotFound(format!("community {}", toggle.community_id))
                })?;
                (
                    (user.doc.clone(), user.version),
                    (community.doc.clone(), community.version),
                )
            };

            let (user, user_version) = user_snapshot;
            let (community, community_version) = community_snapshot;

            let is_member = user.joined_communities.contains(&toggle.community_id);
            let delta = match toggle.counter_delta(is_member) {
                Some(delta) => delta,
                // Already in the target state: commit nothing.
                None => {
                    return Ok(MembershipOutcome {
                        action: toggle.action,
                        applied: false,
                        member_count: community.member_count,
                    })
                }
            };

            // Commit phase: both writes land in one critical section, and
            // only if neither record moved since the read phase.
            let mut inner = self.inner.write().expect("store lock poisoned");
            let versions_match = inner
                .users
                .get(&toggle.user_id)
                .map(|u| u.version == user_version)
                .unwrap_or(false)
                && inner
                    .communities
                    .get(&toggle.community_id)
                    .map(|c| c.version == community_version)
                    .unwrap_or(false);

            if !versions_match {
                debug!(
                    user_id = %toggle.user_id,
                    community_id = %toggle.community_id,
                    attempt,
                    "membership transaction conflicted, retrying"
                );
                continue;
            }

            // The version check passed under the held write lock, so both
            // entries are present and the paired writes cannot half-apply.
            {
                let user_entry = inner
                    .users
                    .get_mut(&toggle.user_id)
                    .expect("user verified under write lock");
                if delta > 0 {
                    user_entry
                        .doc
                        .joined_communities
                        .insert(toggle.community_id.clone());
                } else {
                    user_entry.doc.joined_communities.remove(&toggle.community_id);
                }
                user_entry.version += 1;
            }

            let community_entry = inner
                .communities
                .get_mut(&toggle.community_id)
                .expect("community verified under write lock");
            community_entry.doc.member_count += delta;
            community_entry.version += 1;

            return Ok(MembershipOutcome {
                action: toggle.action,
                applied: true,
                member_count: community_entry.doc.member_count,
            });
        }

        Err(StoreError::Contention(format!(
            "membership toggle for user {} in community {} did not commit after {} attempts",
            toggle.user_id, toggle.community_id, TXN_MAX_ATTEMPTS
        )))
    }
}
