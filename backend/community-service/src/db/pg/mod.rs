/// Postgres store implementations.
///
/// Repository modules keep the raw queries; the store structs adapt them to
/// the traits the services consume.
pub mod blog_repo;
pub mod comment_repo;
pub mod event_repo;
pub mod like_repo;
pub mod project_repo;
pub mod user_repo;

use crate::db::{ContentStore, IdentityDirectory, ReactionStore};
use crate::error::Result;
use crate::models::{
    Blog, BlogPatch, Comment, ContentItem, ContentKind, ContentRef, ContentStatus, Event,
    EventPatch, Like, NewBlog, NewComment, NewEvent, NewProject, Project, ProjectPatch,
    ReactionTarget, TargetKind, UserProfile,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

fn table_for(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Blog => "blogs",
        ContentKind::Project => "projects",
        ContentKind::Event => "events",
    }
}

/// Content store over Postgres.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog> {
        Ok(blog_repo::insert_blog(&self.pool, new).await?)
    }

    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>> {
        Ok(blog_repo::update_blog(&self.pool, id, patch).await?)
    }

    async fn list_blogs(&self, status: Option<ContentStatus>) -> Result<Vec<Blog>> {
        Ok(blog_repo::list_blogs(&self.pool, status).await?)
    }

    async fn blogs_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Blog>> {
        Ok(blog_repo::blogs_by_author(&self.pool, author_id, status).await?)
    }

    async fn insert_project(&self, new: NewProject) -> Result<Project> {
        Ok(project_repo::insert_project(&self.pool, new).await?)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>> {
        Ok(project_repo::update_project(&self.pool, id, patch).await?)
    }

    async fn list_projects(&self, status: Option<ContentStatus>) -> Result<Vec<Project>> {
        Ok(project_repo::list_projects(&self.pool, status).await?)
    }

    async fn projects_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Project>> {
        Ok(project_repo::projects_by_author(&self.pool, author_id, status).await?)
    }

    async fn insert_event(&self, new: NewEvent) -> Result<Event> {
        Ok(event_repo::insert_event(&self.pool, new).await?)
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
        Ok(event_repo::update_event(&self.pool, id, patch).await?)
    }

    async fn list_events(&self, status: Option<ContentStatus>) -> Result<Vec<Event>> {
        Ok(event_repo::list_events(&self.pool, status).await?)
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(event_repo::add_participant(&self.pool, event_id, user_id).await?)
    }

    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(event_repo::remove_participant(&self.pool, event_id, user_id).await?)
    }

    async fn participants(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(event_repo::participants(&self.pool, event_id).await?)
    }

    async fn events_with_participant(&self, user_id: Uuid) -> Result<Vec<Event>> {
        Ok(event_repo::events_with_participant(&self.pool, user_id).await?)
    }

    async fn fetch_item(&self, target: ContentRef) -> Result<Option<ContentItem>> {
        let item = match target.kind {
            ContentKind::Blog => blog_repo::get_blog(&self.pool, target.id)
                .await?
                .map(ContentItem::Blog),
            ContentKind::Project => project_repo::get_project(&self.pool, target.id)
                .await?
                .map(ContentItem::Project),
            ContentKind::Event => event_repo::get_event(&self.pool, target.id)
                .await?
                .map(ContentItem::Event),
        };
        Ok(item)
    }

    async fn review_item(
        &self,
        target: ContentRef,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<ContentItem>> {
        let item = match target.kind {
            ContentKind::Blog => blog_repo::review_blog(&self.pool, target.id, decision, reviewer_id)
                .await?
                .map(ContentItem::Blog),
            ContentKind::Project => {
                project_repo::review_project(&self.pool, target.id, decision, reviewer_id)
                    .await?
                    .map(ContentItem::Project)
            }
            ContentKind::Event => {
                event_repo::review_event(&self.pool, target.id, decision, reviewer_id)
                    .await?
                    .map(ContentItem::Event)
            }
        };
        Ok(item)
    }

    async fn delete_item(&self, target: ContentRef) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let like_kind = TargetKind::from(target.kind);

        // Likes on comments attached to the item
        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE target_kind = 'COMMENT' AND target_id IN (
                SELECT id FROM comments WHERE target_kind = $1 AND target_id = $2
            )
            "#,
        )
        .bind(target.kind)
        .bind(target.id)
        .execute(&mut *tx)
        .await?;

        // Likes on the item itself
        sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(like_kind)
            .bind(target.id)
            .execute(&mut *tx)
            .await?;

        // Comments attached to the item
        sqlx::query("DELETE FROM comments WHERE target_kind = $1 AND target_id = $2")
            .bind(target.kind)
            .bind(target.id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            table_for(target.kind)
        ))
        .bind(target.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn titles_for(&self, targets: &[ContentRef]) -> Result<HashMap<ContentRef, String>> {
        let mut by_kind: HashMap<ContentKind, Vec<Uuid>> = HashMap::new();
        for target in targets {
            by_kind.entry(target.kind).or_default().push(target.id);
        }

        let mut titles = HashMap::new();
        for (kind, ids) in by_kind {
            let rows = sqlx::query(&format!(
                "SELECT id, title FROM {} WHERE id = ANY($1)",
                table_for(kind)
            ))
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            for row in rows {
                let id: Uuid = row.get("id");
                let title: String = row.get("title");
                titles.insert(ContentRef::new(kind, id), title);
            }
        }

        Ok(titles)
    }
}

/// Reaction store over Postgres.
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
}

impl PgReactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    async fn insert_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<Like> {
        like_repo::insert_like(&self.pool, author_id, target).await
    }

    async fn delete_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<bool> {
        like_repo::delete_like(&self.pool, author_id, target).await
    }

    async fn likes_for_targets(&self, targets: &[ReactionTarget]) -> Result<Vec<Like>> {
        like_repo::likes_for_targets(&self.pool, targets).await
    }

    async fn insert_comment(&self, new: NewComment) -> Result<Comment> {
        Ok(comment_repo::insert_comment(&self.pool, new).await?)
    }

    async fn fetch_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment(&self.pool, id).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, id).await?)
    }

    async fn review_comment(
        &self,
        id: Uuid,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<Comment>> {
        Ok(comment_repo::review_comment(&self.pool, id, decision, reviewer_id).await?)
    }

    async fn comments_for_target(
        &self,
        target: ContentRef,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Comment>> {
        Ok(comment_repo::comments_for_target(&self.pool, target, status).await?)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        Ok(comment_repo::list_comments(&self.pool).await?)
    }
}

/// Identity directory over Postgres. Read-only: user rows are provisioned by
/// the identity service.
#[derive(Clone)]
pub struct PgIdentityDirectory {
    pool: PgPool,
}

impl PgIdentityDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityDirectory for PgIdentityDirectory {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(user_repo::profile_by_id(&self.pool, id).await?)
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<UserProfile>> {
        Ok(user_repo::profile_by_username(&self.pool, username).await?)
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserProfile>> {
        Ok(user_repo::profiles_by_ids(&self.pool, ids).await?)
    }
}
