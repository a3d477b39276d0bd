use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A post document. Counters are zero-initialized at creation and only
/// mutated by field-level increments; `peak_hotness_score` is written by
/// an external scoring job and treated here as an opaque sortable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub author_id: String,
    pub community_id: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comment_counts: i64,
    pub peak_hotness_score: f64,
}

impl Post {
    /// Creation time at the millisecond resolution the store keeps.
    pub fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// A community document. The id doubles as the community name and is
/// unique; `member_count` is denormalized and must always equal the
/// number of users whose joined-set contains this community.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
}

/// A user profile document, owned by the external auth/profile
/// collaborator. Only the joined-set is mutated here, and exclusively
/// through the membership transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub joined_communities: HashSet<String>,
}

/// Author metadata attached to a feed post during hydration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl AuthorInfo {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }

    /// Placeholder used when the author record cannot be resolved. The
    /// post is still returned; a hydration miss never drops it.
    pub fn unknown() -> Self {
        Self {
            username: "unknown".to_string(),
            avatar_url: None,
        }
    }
}

/// A post enriched with resolved author metadata.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorInfo,
}

/// Feed page response. `next_cursor` is `null` when the scan is
/// exhausted, which is the "no more pages" marker and not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
    pub next_cursor: Option<String>,
}

/// Requested membership transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    Join,
    Leave,
}

impl MembershipAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipAction::Join => "join",
            MembershipAction::Leave => "leave",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            MembershipAction::Join => "joined",
            MembershipAction::Leave => "left",
        }
    }
}
