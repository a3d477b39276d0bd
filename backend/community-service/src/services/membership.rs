//! Membership Transaction Component.
//!
//! Join/leave is a two-state machine per (user, community) pair with
//! idempotent transitions. The read-modify-write travels to the store as
//! one [`MembershipToggle`] so the joined-set mutation and the member
//! counter delta commit atomically; the counter must never drift from
//! the true member-set size, even under concurrent toggles.

use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::MembershipAction;
use crate::store::{DocumentStore, MembershipOutcome, MembershipToggle};

pub struct MembershipService {
    store: Arc<dyn DocumentStore>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn toggle(
        &self,
        user_id: &str,
        community_id: &str,
        action: MembershipAction,
    ) -> Result<MembershipOutcome> {
        let community_id = community_id.trim();
        if community_id.is_empty() {
            return Err(AppError::Validation("communityId is required".to_string()));
        }

        let toggle = MembershipToggle {
            user_id: user_id.to_string(),
            community_id: community_id.to_string(),
            action,
        };

        let outcome = self.store.apply_membership(&toggle).await?;

        info!(
            user_id,
            community_id,
            action = action.as_str(),
            applied = outcome.applied,
            member_count = outcome.member_count,
            "membership toggle committed"
        );

        Ok(outcome)
    }
}
