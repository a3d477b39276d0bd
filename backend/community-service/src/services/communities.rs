//! Community creation. The community id doubles as the name; uniqueness
//! is enforced at creation and two communities can never share an id.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Community, MembershipAction};
use crate::store::{DocumentStore, MembershipToggle};

pub struct CommunityService {
    store: Arc<dyn DocumentStore>,
}

impl CommunityService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a community and join its creator through the membership
    /// transaction, so the member counter equals the member-set size from
    /// the first moment.
    pub async fn create_community(
        &self,
        creator_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Community> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(AppError::Validation(
                "name and description are required".to_string(),
            ));
        }

        let community = Community {
            id: name.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            creator_id: creator_id.to_string(),
            created_at: Utc::now(),
            member_count: 0,
        };

        self.store.insert_community(community).await?;

        let outcome = self
            .store
            .apply_membership(&MembershipToggle {
                user_id: creator_id.to_string(),
                community_id: name.to_string(),
                action: MembershipAction::Join,
            })
            .await?;

        let community = self
            .store
            .get_community(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("community {}", name)))?;

        info!(
            community_id = name,
            creator_id,
            member_count = outcome.member_count,
            "community created"
        );
        Ok(community)
    }
}
