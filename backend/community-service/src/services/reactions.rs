/// Likes and comments.
///
/// Both reaction kinds validate target existence before writing; a dangling
/// target is a `NotFound`, never a silently orphaned row.
use crate::db::{ContentStore, ReactionStore};
use crate::error::{AppError, Result};
use crate::middleware::permissions::can_delete;
use crate::models::{AuthUser, Comment, ContentRef, Like, NewComment, ReactionTarget};
use uuid::Uuid;

pub struct ReactionService<'a> {
    content: &'a dyn ContentStore,
    reactions: &'a dyn ReactionStore,
}

impl<'a> ReactionService<'a> {
    pub fn new(content: &'a dyn ContentStore, reactions: &'a dyn ReactionStore) -> Self {
        Self { content, reactions }
    }

    async fn ensure_target_exists(&self, target: ReactionTarget) -> Result<()> {
        let exists = match target.kind.as_content_kind() {
            None => self.reactions.fetch_comment(target.id).await?.is_some(),
            Some(kind) => self
                .content
                .fetch_item(ContentRef::new(kind, target.id))
                .await?
                .is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} not found", target.kind)))
        }
    }

    /// Create a Like. At most one per (author, target); a duplicate fails
    /// with `Validation`.
    pub async fn like(&self, caller: &AuthUser, target: ReactionTarget) -> Result<Like> {
        self.ensure_target_exists(target).await?;
        let like = self.reactions.insert_like(caller.id, target).await?;
        tracing::debug!(kind = %target.kind, id = %target.id, author = %caller.id, "liked");
        Ok(like)
    }

    /// Remove a Like. Not idempotent: a second unlike of the same key fails
    /// with `NotFound`.
    pub async fn unlike(&self, caller: &AuthUser, target: ReactionTarget) -> Result<()> {
        if !self.reactions.delete_like(caller.id, target).await? {
            return Err(AppError::NotFound("like not found".to_string()));
        }
        tracing::debug!(kind = %target.kind, id = %target.id, author = %caller.id, "unliked");
        Ok(())
    }

    /// Create a Comment on a content item. Starts PENDING.
    pub async fn comment(
        &self,
        caller: &AuthUser,
        target: ContentRef,
        content: String,
    ) -> Result<Comment> {
        self.content
            .fetch_item(target)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", target.kind)))?;

        self.reactions
            .insert_comment(NewComment {
                author_id: caller.id,
                target,
                content,
            })
            .await
    }

    /// Delete a Comment as its author or as an admin; the comment's likes go
    /// with it.
    pub async fn delete_comment(&self, caller: &AuthUser, comment_id: Uuid) -> Result<()> {
        let comment = self
            .reactions
            .fetch_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

        can_delete(caller, comment.author_id)?;

        if !self.reactions.delete_comment(comment_id).await? {
            return Err(AppError::NotFound("comment not found".to_string()));
        }
        Ok(())
    }
}
