/// Moderation state machine
///
/// PENDING is the only state a review can leave; APPROVED and REJECTED are
/// terminal. The decision is applied as a single conditional update so a
/// concurrent double-review decides exactly once.
use crate::db::{ContentStore, ReactionStore};
use crate::error::{AppError, Result};
use crate::middleware::permissions::require_admin;
use crate::models::{AuthUser, Comment, ContentItem, ContentRef, ContentStatus};
use uuid::Uuid;

/// Check a requested transition against the current status.
pub fn validate_transition(current: ContentStatus, requested: ContentStatus) -> Result<()> {
    if !matches!(
        requested,
        ContentStatus::Approved | ContentStatus::Rejected
    ) {
        return Err(AppError::InvalidStateTransition(
            "status must be APPROVED or REJECTED".to_string(),
        ));
    }
    if current != ContentStatus::Pending {
        return Err(AppError::InvalidStateTransition(
            "item has already been reviewed".to_string(),
        ));
    }
    Ok(())
}

pub struct ModerationService<'a> {
    content: &'a dyn ContentStore,
    reactions: &'a dyn ReactionStore,
}

impl<'a> ModerationService<'a> {
    pub fn new(content: &'a dyn ContentStore, reactions: &'a dyn ReactionStore) -> Self {
        Self { content, reactions }
    }

    /// Review a content item. Admin capability required; the item must still
    /// be PENDING.
    pub async fn review_content(
        &self,
        caller: &AuthUser,
        target: ContentRef,
        decision: ContentStatus,
    ) -> Result<ContentItem> {
        require_admin(caller)?;

        let item = self
            .content
            .fetch_item(target)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", target.kind)))?;

        validate_transition(item.status(), decision)?;

        match self
            .content
            .review_item(target, decision, caller.id)
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    kind = %target.kind,
                    id = %target.id,
                    reviewer = %caller.id,
                    decision = %decision,
                    "content reviewed"
                );
                Ok(updated)
            }
            // Lost the race against another reviewer between fetch and update.
            None => Err(AppError::InvalidStateTransition(
                "item has already been reviewed".to_string(),
            )),
        }
    }

    /// Review a comment under the same transition rules as content.
    pub async fn review_comment(
        &self,
        caller: &AuthUser,
        comment_id: Uuid,
        decision: ContentStatus,
    ) -> Result<Comment> {
        require_admin(caller)?;

        let comment = self
            .reactions
            .fetch_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

        validate_transition(comment.status, decision)?;

        match self
            .reactions
            .review_comment(comment_id, decision, caller.id)
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    id = %comment_id,
                    reviewer = %caller.id,
                    decision = %decision,
                    "comment reviewed"
                );
                Ok(updated)
            }
            None => Err(AppError::InvalidStateTransition(
                "comment has already been reviewed".to_string(),
            )),
        }
    }
}
