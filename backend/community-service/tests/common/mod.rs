//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use community_service::models::{Post, User};
use community_service::store::memory::MemoryStore;
use community_service::store::DocumentStore;

pub fn ts(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

pub fn post(id: &str, community: &str, author: &str, created_millis: i64) -> Post {
    Post {
        id: id.to_string(),
        title: format!("title {}", id),
        description: format!("description {}", id),
        image_url: None,
        author_id: author.to_string(),
        community_id: community.to_string(),
        created_at: ts(created_millis),
        likes_count: 0,
        comment_counts: 0,
        peak_hotness_score: 0.0,
    }
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("user-{}", id),
        avatar_url: Some(format!("https://cdn.example/avatars/{}.png", id)),
        joined_communities: HashSet::new(),
    }
}

pub async fn seed_posts(store: &Arc<MemoryStore>, posts: Vec<Post>) {
    for p in posts {
        store.insert_post(p).await.expect("seed post");
    }
}
