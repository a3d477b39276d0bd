use std::sync::Arc;

use crate::services::{CommunityService, FeedService, MembershipService, PostService};
use crate::store::DocumentStore;

/// Shared application state: every service holds the same explicitly
/// threaded store handle, so a test backend can stand in for the managed
/// document database.
pub struct AppState {
    pub feed: FeedService,
    pub membership: MembershipService,
    pub posts: PostService,
    pub communities: CommunityService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            feed: FeedService::new(store.clone()),
            membership: MembershipService::new(store.clone()),
            posts: PostService::new(store.clone()),
            communities: CommunityService::new(store),
        }
    }
}
