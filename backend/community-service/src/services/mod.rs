pub mod communities;
pub mod feed;
pub mod hydration;
pub mod membership;
pub mod posts;

pub use communities::CommunityService;
pub use feed::{FeedRequest, FeedScope, FeedService, SortMode};
pub use membership::MembershipService;
pub use posts::{NewPost, PostService};
