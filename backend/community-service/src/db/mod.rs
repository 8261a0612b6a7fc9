/// Database access layer
///
/// Store traits consumed by the services and the view assembler, plus the
/// Postgres implementations. The traits exist so the read path can be driven
/// against in-memory stores in tests; Postgres is the only serialization
/// point in production.
pub mod pg;

use crate::error::Result;
use crate::models::{
    Blog, BlogPatch, Comment, ContentItem, ContentRef, ContentStatus, Event, EventPatch, Like,
    NewBlog, NewComment, NewEvent, NewProject, Project, ProjectPatch, ReactionTarget, UserProfile,
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

pub use pg::{PgContentStore, PgIdentityDirectory, PgReactionStore};

/// Store for the three moderated content kinds.
#[async_trait]
pub trait ContentStore: Send + Sync {
    // Blogs
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog>;
    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>>;
    /// `None` lists every blog regardless of status (admin listing).
    async fn list_blogs(&self, status: Option<ContentStatus>) -> Result<Vec<Blog>>;
    async fn blogs_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Blog>>;

    // Projects
    async fn insert_project(&self, new: NewProject) -> Result<Project>;
    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>>;
    async fn list_projects(&self, status: Option<ContentStatus>) -> Result<Vec<Project>>;
    async fn projects_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Project>>;

    // Events
    async fn insert_event(&self, new: NewEvent) -> Result<Event>;
    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>>;
    async fn list_events(&self, status: Option<ContentStatus>) -> Result<Vec<Event>>;
    /// Idempotent set-add. `false` when the event does not exist.
    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool>;
    /// Idempotent set-remove. `false` when the event does not exist.
    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn participants(&self, event_id: Uuid) -> Result<Vec<Uuid>>;
    async fn events_with_participant(&self, user_id: Uuid) -> Result<Vec<Event>>;

    // Any kind
    async fn fetch_item(&self, target: ContentRef) -> Result<Option<ContentItem>>;
    /// Single conditional update: applies the decision and stamps the
    /// reviewer only while the row is still PENDING. `None` when the row is
    /// missing or already decided.
    async fn review_item(
        &self,
        target: ContentRef,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<ContentItem>>;
    /// Deletes the item together with its comments, its likes, and the likes
    /// on those comments, in one transaction.
    async fn delete_item(&self, target: ContentRef) -> Result<bool>;
    /// Batch title lookup for the admin comment listing.
    async fn titles_for(&self, targets: &[ContentRef]) -> Result<HashMap<ContentRef, String>>;
}

/// Store for Likes and Comments.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Fails with `Validation` when the `(author, target)` pair already has a
    /// Like row; uniqueness is enforced at the store level.
    async fn insert_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<Like>;
    /// `false` when no matching row exists.
    async fn delete_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<bool>;
    /// One batched fetch of every Like row pointing at any of `targets`.
    async fn likes_for_targets(&self, targets: &[ReactionTarget]) -> Result<Vec<Like>>;

    async fn insert_comment(&self, new: NewComment) -> Result<Comment>;
    async fn fetch_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Deletes the comment and its likes. `false` when the comment is absent.
    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
    /// Conditional update, same contract as `ContentStore::review_item`.
    async fn review_comment(
        &self,
        id: Uuid,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<Comment>>;
    async fn comments_for_target(
        &self,
        target: ContentRef,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Comment>>;
    /// Every comment regardless of status (admin listing).
    async fn list_comments(&self) -> Result<Vec<Comment>>;
}

/// Read-only directory resolving identity references to display projections.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<UserProfile>>;
    async fn profile_by_username(&self, username: &str) -> Result<Option<UserProfile>>;
    /// One batched lookup; absent ids are simply missing from the map.
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserProfile>>;
}
