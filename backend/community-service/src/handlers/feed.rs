use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::services::{FeedRequest, FeedScope, SortMode};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQueryParams {
    #[serde(default = "default_scope")]
    pub scope: String,
    pub community_id: Option<String>,
    pub sort_mode: Option<String>,
    pub page_size: Option<usize>,
    pub cursor: Option<String>,
}

fn default_scope() -> String {
    "global".to_string()
}

impl FeedQueryParams {
    fn to_request(&self) -> FeedRequest {
        let scope = if self.scope == "community" {
            FeedScope::Community
        } else {
            FeedScope::Global
        };

        FeedRequest {
            scope,
            community_id: self.community_id.clone(),
            sort: SortMode::parse(self.sort_mode.as_deref()),
            page_size: self.page_size,
            cursor: self.cursor.clone(),
        }
    }
}

pub async fn get_feed(
    query: web::Query<FeedQueryParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let request = query.to_request();

    debug!(
        scope = %query.scope,
        sort = request.sort.as_str(),
        "feed request"
    );

    let page = state.feed.fetch_page(&request).await?;
    Ok(HttpResponse::Ok().json(page))
}
