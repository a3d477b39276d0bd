//! Feed query planner and page assembly.
//!
//! Sort-mode to ordering policy:
//!
//! | sortMode   | global scope                       | community scope |
//! |------------|------------------------------------|-----------------|
//! | new        | created-at desc                    | created-at desc |
//! | hot        | hotness desc, created-at tie-break | created-at desc |
//! | trending   | alias of hot                       | created-at desc |
//! | top        | likes desc, created-at tie-break   | created-at desc |
//! | (unknown)  | hot                                | created-at desc |
//!
//! Hotness does not discriminate within one community, so every
//! community-scoped mode collapses to creation time; `trending` stays an
//! alias of `hot` until it grows an independent decay-based score.

use std::sync::Arc;
use tracing::debug;

use crate::cursor;
use crate::error::{AppError, Result};
use crate::models::{FeedResponse, Post};
use crate::services::hydration;
use crate::store::{DocumentStore, PostOrdering, PostQuery};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    Global,
    Community,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Hot,
    New,
    Trending,
    Top,
}

impl SortMode {
    /// Unknown or absent sort modes fall back to `hot` rather than
    /// failing; the scope parameter is the only strictly validated input.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("new") => SortMode::New,
            Some("hot") => SortMode::Hot,
            Some("trending") => SortMode::Trending,
            Some("top") => SortMode::Top,
            _ => SortMode::Hot,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Trending => "trending",
            SortMode::Top => "top",
        }
    }
}

/// A parsed feed request, before planning.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub scope: FeedScope,
    pub community_id: Option<String>,
    pub sort: SortMode,
    pub page_size: Option<usize>,
    pub cursor: Option<String>,
}

pub struct FeedService {
    store: Arc<dyn DocumentStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Build the ordered, filtered, cursor-resumable query for a request.
    pub fn plan(request: &FeedRequest) -> Result<PostQuery> {
        let community_id = match request.scope {
            FeedScope::Community => {
                let id = request
                    .community_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(
                            "communityId is required for community scope".to_string(),
                        )
                    })?;
                Some(id.to_string())
            }
            FeedScope::Global => None,
        };

        let ordering = match (request.scope, request.sort) {
            (FeedScope::Community, _) => PostOrdering::CreatedDesc,
            (FeedScope::Global, SortMode::New) => PostOrdering::CreatedDesc,
            (FeedScope::Global, SortMode::Hot | SortMode::Trending) => {
                PostOrdering::HotnessCreatedDesc
            }
            (FeedScope::Global, SortMode::Top) => PostOrdering::LikesCreatedDesc,
        };

        let after = match &request.cursor {
            Some(token) => Some(cursor::decode(token, ordering.key_kind())?),
            None => None,
        };

        let limit = request
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        Ok(PostQuery {
            community_id,
            ordering,
            after,
            limit,
        })
    }

    /// Execute one page of the feed scan: plan, query, hydrate authors,
    /// and hand back the resume token for the next page.
    pub async fn fetch_page(&self, request: &FeedRequest) -> Result<FeedResponse> {
        let query = Self::plan(request)?;

        debug!(
            sort = request.sort.as_str(),
            community = query.community_id.as_deref().unwrap_or("<global>"),
            limit = query.limit,
            resumed = query.after.is_some(),
            "executing feed query"
        );

        let posts: Vec<Post> = self.store.query_posts(&query).await?;

        // No rows after the cursor: the scan is exhausted, not failed.
        if posts.is_empty() {
            return Ok(FeedResponse {
                posts: Vec::new(),
                next_cursor: None,
            });
        }

        let last = posts.last().map(|post| query.ordering.primary_key(post));
        let next_cursor = last.map(cursor::encode);

        let posts = hydration::attach_authors(self.store.as_ref(), posts).await;

        Ok(FeedResponse { posts, next_cursor })
    }
}
