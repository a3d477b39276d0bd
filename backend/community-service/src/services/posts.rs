//! Post creation. Image upload/transformation stays with the external
//! media collaborator; posts carry at most a URL reference to it.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Post;
use crate::store::DocumentStore;

/// Validated input for a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub community_id: String,
    pub image_url: Option<String>,
}

pub struct PostService {
    store: Arc<dyn DocumentStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a post with a fresh stable id, a single immutable creation
    /// timestamp, and zero-initialized counters.
    pub async fn create_post(&self, author_id: &str, input: NewPost) -> Result<Post> {
        let title = input.title.trim();
        let description = input.description.trim();
        let community_id = input.community_id.trim();
        if title.is_empty() || description.is_empty() || community_id.is_empty() {
            return Err(AppError::Validation(
                "title, description and communityId are required".to_string(),
            ));
        }

        if self.store.get_community(community_id).await?.is_none() {
            return Err(AppError::NotFound(format!("community {}", community_id)));
        }

        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: input
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            author_id: author_id.to_string(),
            community_id: community_id.to_string(),
            created_at: Utc::now(),
            likes_count: 0,
            comment_counts: 0,
            peak_hotness_score: 0.0,
        };

        self.store.insert_post(post.clone()).await?;

        info!(post_id = %post.id, community_id, author_id, "post created");
        Ok(post)
    }
}
