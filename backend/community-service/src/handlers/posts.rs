use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::NewPost;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    pub community_id: String,
    pub image_url: Option<String>,
}

pub async fn create_post(
    user: UserId,
    body: web::Json<CreatePostRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let post = state
        .posts
        .create_post(
            &user.0,
            NewPost {
                title: body.title,
                description: body.description,
                community_id: body.community_id,
                image_url: body.image_url,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Post successfully created",
        "post": post,
    })))
}
