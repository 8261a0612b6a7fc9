/// Write operations for the three content kinds.
///
/// Capability checks run once at operation entry; every unmet precondition
/// aborts before any mutation.
use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::middleware::permissions::{can_delete, can_manage_event, require_author};
use crate::models::{
    content::normalize_tags, AuthUser, Blog, BlogPatch, ContentItem, ContentKind, ContentRef,
    Event, EventPatch, NewBlog, NewEvent, NewProject, Project, ProjectPatch,
};
use uuid::Uuid;

/// Delete a content item as `caller`. Author or admin only; cascades to the
/// item's comments and likes.
async fn delete_item(
    content: &dyn ContentStore,
    caller: &AuthUser,
    target: ContentRef,
) -> Result<()> {
    let item = content
        .fetch_item(target)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", target.kind)))?;

    can_delete(caller, item.author_id())?;

    if !content.delete_item(target).await? {
        return Err(AppError::NotFound(format!("{} not found", target.kind)));
    }

    tracing::info!(kind = %target.kind, id = %target.id, caller = %caller.id, "content deleted");
    Ok(())
}

pub struct BlogService<'a> {
    content: &'a dyn ContentStore,
}

impl<'a> BlogService<'a> {
    pub fn new(content: &'a dyn ContentStore) -> Self {
        Self { content }
    }

    pub async fn create(&self, caller: &AuthUser, mut new: NewBlog) -> Result<Blog> {
        new.author_id = caller.id;
        new.tags = normalize_tags(new.tags);
        self.content.insert_blog(new).await
    }

    /// Author-only edit.
    pub async fn update(&self, caller: &AuthUser, id: Uuid, mut patch: BlogPatch) -> Result<Blog> {
        let item = self
            .content
            .fetch_item(ContentRef::new(ContentKind::Blog, id))
            .await?
            .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

        require_author(caller, item.author_id())?;

        patch.tags = patch.tags.map(normalize_tags);
        self.content
            .update_blog(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("blog not found".to_string()))
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<()> {
        delete_item(self.content, caller, ContentRef::new(ContentKind::Blog, id)).await
    }
}

pub struct ProjectService<'a> {
    content: &'a dyn ContentStore,
}

impl<'a> ProjectService<'a> {
    pub fn new(content: &'a dyn ContentStore) -> Self {
        Self { content }
    }

    pub async fn create(&self, caller: &AuthUser, mut new: NewProject) -> Result<Project> {
        new.author_id = caller.id;
        new.tags = normalize_tags(new.tags);
        new.tech_stack = normalize_tags(new.tech_stack);
        self.content.insert_project(new).await
    }

    /// Author-only edit.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        mut patch: ProjectPatch,
    ) -> Result<Project> {
        let item = self
            .content
            .fetch_item(ContentRef::new(ContentKind::Project, id))
            .await?
            .ok_or_else(|| AppError::NotFound("project not found".to_string()))?;

        require_author(caller, item.author_id())?;

        patch.tags = patch.tags.map(normalize_tags);
        patch.tech_stack = patch.tech_stack.map(normalize_tags);
        self.content
            .update_project(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("project not found".to_string()))
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<()> {
        delete_item(
            self.content,
            caller,
            ContentRef::new(ContentKind::Project, id),
        )
        .await
    }
}

pub struct EventService<'a> {
    content: &'a dyn ContentStore,
}

impl<'a> EventService<'a> {
    pub fn new(content: &'a dyn ContentStore) -> Self {
        Self { content }
    }

    pub async fn create(&self, caller: &AuthUser, mut new: NewEvent) -> Result<Event> {
        new.author_id = caller.id;
        new.tags = normalize_tags(new.tags);
        self.content.insert_event(new).await
    }

    /// Organizer-or-admin edit; also how the winner and a replaced event
    /// image land on the row.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        mut patch: EventPatch,
    ) -> Result<Event> {
        let item = self
            .content
            .fetch_item(ContentRef::new(ContentKind::Event, id))
            .await?
            .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;

        can_manage_event(caller, item.author_id())?;

        patch.tags = patch.tags.map(normalize_tags);
        self.content
            .update_event(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("event not found".to_string()))
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<()> {
        delete_item(
            self.content,
            caller,
            ContentRef::new(ContentKind::Event, id),
        )
        .await
    }

    /// Idempotent join.
    pub async fn join(&self, caller: &AuthUser, event_id: Uuid) -> Result<()> {
        if !self.content.add_participant(event_id, caller.id).await? {
            return Err(AppError::NotFound("event not found".to_string()));
        }
        Ok(())
    }

    /// Idempotent leave.
    pub async fn leave(&self, caller: &AuthUser, event_id: Uuid) -> Result<()> {
        if !self.content.remove_participant(event_id, caller.id).await? {
            return Err(AppError::NotFound("event not found".to_string()));
        }
        Ok(())
    }

    /// Fetch for capability checks on image upload.
    pub async fn fetch(&self, id: Uuid) -> Result<ContentItem> {
        self.content
            .fetch_item(ContentRef::new(ContentKind::Event, id))
            .await?
            .ok_or_else(|| AppError::NotFound("event not found".to_string()))
    }
}
