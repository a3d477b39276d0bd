//! Author hydration: batch-resolve author metadata for a page of posts.
//!
//! The page's distinct author ids are looked up in bounded chunks rather
//! than one round trip per post. A missing author record, or a failed
//! chunk, degrades that post to the `unknown` placeholder; hydration
//! never rejects the page.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::models::{AuthorInfo, FeedPost, Post};
use crate::store::{DocumentStore, MAX_ID_BATCH};

pub async fn attach_authors(store: &dyn DocumentStore, posts: Vec<Post>) -> Vec<FeedPost> {
    let mut seen = HashSet::new();
    let author_ids: Vec<String> = posts
        .iter()
        .filter(|post| seen.insert(post.author_id.clone()))
        .map(|post| post.author_id.clone())
        .collect();

    let mut authors: HashMap<String, AuthorInfo> = HashMap::with_capacity(author_ids.len());
    for chunk in author_ids.chunks(MAX_ID_BATCH) {
        match store.get_users_by_ids(chunk).await {
            Ok(users) => {
                for user in &users {
                    authors.insert(user.id.clone(), AuthorInfo::from_user(user));
                }
            }
            Err(err) => {
                warn!(
                    chunk_len = chunk.len(),
                    "author batch lookup failed, degrading to placeholders: {}", err
                );
            }
        }
    }

    posts
        .into_iter()
        .map(|post| {
            let author = authors
                .get(&post.author_id)
                .cloned()
                .unwrap_or_else(AuthorInfo::unknown);
            FeedPost { post, author }
        })
        .collect()
}
