pub mod communities;
pub mod feed;
pub mod posts;
