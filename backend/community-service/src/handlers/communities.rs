use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::MembershipAction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: String,
}

pub async fn create_community(
    user: UserId,
    body: web::Json<CreateCommunityRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let community = state
        .communities
        .create_community(&user.0, &body.name, &body.description)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Community created successfully",
        "community": community,
    })))
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub action: MembershipAction,
}

pub async fn toggle_membership(
    user: UserId,
    path: web::Path<String>,
    body: web::Json<MembershipRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let community_id = path.into_inner();
    let outcome = state
        .membership
        .toggle(&user.0, &community_id, body.action)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Successfully {} community", outcome.action.past_tense()),
        "outcome": outcome,
    })))
}
