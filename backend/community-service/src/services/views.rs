/// View Assembler
///
/// Builds read snapshots of content items enriched with identity
/// projections, aggregate like counts, and the viewer's own reaction state.
/// Every assembled response batches its reaction fetch and its identity
/// fetch: one query each per response, joined in memory. Counts within one
/// response therefore come from a single snapshot; the window between the
/// content query and the reaction query is an accepted eventual-consistency
/// window, not hidden.
use crate::db::{ContentStore, IdentityDirectory, ReactionStore};
use crate::error::{AppError, Result};
use crate::models::{
    Blog, Comment, ContentKind, ContentRef, ContentStatus, Event, EventType, Like, Project,
    ReactionTarget, TargetKind, UserProfile,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory index over one batch of Like rows.
pub struct LikeIndex {
    by_target: HashMap<ReactionTarget, Vec<Uuid>>,
}

impl LikeIndex {
    pub fn build(likes: Vec<Like>) -> Self {
        let mut by_target: HashMap<ReactionTarget, Vec<Uuid>> = HashMap::new();
        for like in likes {
            by_target.entry(like.target).or_default().push(like.author_id);
        }
        Self { by_target }
    }

    pub fn count(&self, target: ReactionTarget) -> i64 {
        self.by_target.get(&target).map_or(0, |v| v.len() as i64)
    }

    /// `false` for an unauthenticated viewer, never null.
    pub fn viewer_has_liked(&self, target: ReactionTarget, viewer: Option<Uuid>) -> bool {
        match viewer {
            Some(viewer) => self
                .by_target
                .get(&target)
                .is_some_and(|authors| authors.contains(&viewer)),
            None => false,
        }
    }

    fn stats(&self, target: ReactionTarget, viewer: Option<Uuid>) -> (i64, bool) {
        (self.count(target), self.viewer_has_liked(target, viewer))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    pub published_at: DateTime<Utc>,
    pub author: Option<UserProfile>,
    pub reviewed_by: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_has_liked: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub source_code_link: String,
    pub deployed_link: Option<String>,
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    pub published_at: DateTime<Utc>,
    pub author: Option<UserProfile>,
    pub reviewed_by: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_has_liked: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub author: Option<UserProfile>,
    pub like_count: i64,
    pub viewer_has_liked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_image: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub venue: String,
    pub event_type: EventType,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub author: Option<UserProfile>,
    pub reviewed_by: Option<UserProfile>,
    pub winner: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<UserProfile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_has_liked: Option<bool>,
    /// Approved comments, event detail only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// Admin moderation-console row: every comment regardless of status, with
/// the title of whatever it targets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentView {
    pub id: Uuid,
    pub content: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub target_kind: ContentKind,
    pub target_id: Uuid,
    pub target_title: Option<String>,
    pub author: Option<UserProfile>,
    pub reviewed_by: Option<UserProfile>,
}

/// A user's public profile with their approved work and joined events.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub blogs: Vec<BlogView>,
    pub projects: Vec<ProjectView>,
    pub events: Vec<EventView>,
}

fn blog_view(
    blog: Blog,
    profiles: &HashMap<Uuid, UserProfile>,
    stats: Option<(i64, bool)>,
) -> BlogView {
    BlogView {
        id: blog.id,
        title: blog.title,
        content: blog.content,
        tags: blog.tags,
        status: blog.status,
        published_at: blog.published_at,
        author: profiles.get(&blog.author_id).cloned(),
        reviewed_by: blog.reviewed_by.and_then(|id| profiles.get(&id).cloned()),
        like_count: stats.map(|(count, _)| count),
        viewer_has_liked: stats.map(|(_, liked)| liked),
    }
}

fn project_view(
    project: Project,
    profiles: &HashMap<Uuid, UserProfile>,
    stats: Option<(i64, bool)>,
) -> ProjectView {
    ProjectView {
        id: project.id,
        title: project.title,
        description: project.description,
        source_code_link: project.source_code_link,
        deployed_link: project.deployed_link,
        tech_stack: project.tech_stack,
        tags: project.tags,
        status: project.status,
        published_at: project.published_at,
        author: profiles.get(&project.author_id).cloned(),
        reviewed_by: project.reviewed_by.and_then(|id| profiles.get(&id).cloned()),
        like_count: stats.map(|(count, _)| count),
        viewer_has_liked: stats.map(|(_, liked)| liked),
    }
}

fn event_view(
    event: Event,
    profiles: &HashMap<Uuid, UserProfile>,
    stats: Option<(i64, bool)>,
    participants: Option<Vec<UserProfile>>,
    comments: Option<Vec<CommentView>>,
) -> EventView {
    EventView {
        id: event.id,
        title: event.title,
        description: event.description,
        event_image: event.event_image,
        date: event.date,
        duration_minutes: event.duration_minutes,
        venue: event.venue,
        event_type: event.event_type,
        tags: event.tags,
        status: event.status,
        created_at: event.created_at,
        author: profiles.get(&event.author_id).cloned(),
        reviewed_by: event.reviewed_by.and_then(|id| profiles.get(&id).cloned()),
        winner: event.winner.and_then(|id| profiles.get(&id).cloned()),
        participants,
        like_count: stats.map(|(count, _)| count),
        viewer_has_liked: stats.map(|(_, liked)| liked),
        comments,
    }
}

fn comment_view(
    comment: Comment,
    profiles: &HashMap<Uuid, UserProfile>,
    likes: &LikeIndex,
    viewer: Option<Uuid>,
) -> CommentView {
    let target = ReactionTarget::comment(comment.id);
    CommentView {
        id: comment.id,
        content: comment.content,
        status: comment.status,
        created_at: comment.created_at,
        author: profiles.get(&comment.author_id).cloned(),
        like_count: likes.count(target),
        viewer_has_liked: likes.viewer_has_liked(target, viewer),
    }
}

pub struct ViewAssembler<'a> {
    content: &'a dyn ContentStore,
    reactions: &'a dyn ReactionStore,
    identities: &'a dyn IdentityDirectory,
}

impl<'a> ViewAssembler<'a> {
    pub fn new(
        content: &'a dyn ContentStore,
        reactions: &'a dyn ReactionStore,
        identities: &'a dyn IdentityDirectory,
    ) -> Self {
        Self {
            content,
            reactions,
            identities,
        }
    }

    async fn profiles(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, UserProfile>> {
        let mut ids = ids;
        ids.sort();
        ids.dedup();
        self.identities.profiles_by_ids(&ids).await
    }

    // ------------------------------------------------------------------
    // Blogs
    // ------------------------------------------------------------------

    pub async fn approved_blogs(&self) -> Result<Vec<BlogView>> {
        self.blog_listing(Some(ContentStatus::Approved)).await
    }

    pub async fn all_blogs(&self) -> Result<Vec<BlogView>> {
        self.blog_listing(None).await
    }

    async fn blog_listing(&self, status: Option<ContentStatus>) -> Result<Vec<BlogView>> {
        let blogs = self.content.list_blogs(status).await?;
        let profiles = self
            .profiles(identity_ids(blogs.iter().map(|b| (b.author_id, b.reviewed_by))))
            .await?;

        Ok(blogs
            .into_iter()
            .map(|b| blog_view(b, &profiles, None))
            .collect())
    }

    pub async fn blog_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<BlogView> {
        let blog = match self
            .content
            .fetch_item(ContentRef::new(ContentKind::Blog, id))
            .await?
        {
            Some(crate::models::ContentItem::Blog(blog)) => blog,
            _ => return Err(AppError::NotFound("blog not found".to_string())),
        };

        let target = ReactionTarget::new(TargetKind::Blog, blog.id);
        let likes = LikeIndex::build(self.reactions.likes_for_targets(&[target]).await?);
        let profiles = self
            .profiles(identity_ids([(blog.author_id, blog.reviewed_by)].into_iter()))
            .await?;

        let stats = likes.stats(target, viewer);
        Ok(blog_view(blog, &profiles, Some(stats)))
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn approved_projects(&self) -> Result<Vec<ProjectView>> {
        self.project_listing(Some(ContentStatus::Approved)).await
    }

    pub async fn all_projects(&self) -> Result<Vec<ProjectView>> {
        self.project_listing(None).await
    }

    async fn project_listing(&self, status: Option<ContentStatus>) -> Result<Vec<ProjectView>> {
        let projects = self.content.list_projects(status).await?;
        let profiles = self
            .profiles(identity_ids(
                projects.iter().map(|p| (p.author_id, p.reviewed_by)),
            ))
            .await?;

        Ok(projects
            .into_iter()
            .map(|p| project_view(p, &profiles, None))
            .collect())
    }

    pub async fn project_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<ProjectView> {
        let project = match self
            .content
            .fetch_item(ContentRef::new(ContentKind::Project, id))
            .await?
        {
            Some(crate::models::ContentItem::Project(project)) => project,
            _ => return Err(AppError::NotFound("project not found".to_string())),
        };

        let target = ReactionTarget::new(TargetKind::Project, project.id);
        let likes = LikeIndex::build(self.reactions.likes_for_targets(&[target]).await?);
        let profiles = self
            .profiles(identity_ids(
                [(project.author_id, project.reviewed_by)].into_iter(),
            ))
            .await?;

        let stats = likes.stats(target, viewer);
        Ok(project_view(project, &profiles, Some(stats)))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub async fn approved_events(&self) -> Result<Vec<EventView>> {
        self.event_listing(Some(ContentStatus::Approved)).await
    }

    pub async fn all_events(&self) -> Result<Vec<EventView>> {
        self.event_listing(None).await
    }

    async fn event_listing(&self, status: Option<ContentStatus>) -> Result<Vec<EventView>> {
        let events = self.content.list_events(status).await?;
        let mut ids: Vec<Uuid> =
            identity_ids(events.iter().map(|e| (e.author_id, e.reviewed_by)));
        ids.extend(events.iter().filter_map(|e| e.winner));
        let profiles = self.profiles(ids).await?;

        Ok(events
            .into_iter()
            .map(|e| event_view(e, &profiles, None, None, None))
            .collect())
    }

    /// Event detail: full enrichment, including the APPROVED comments with
    /// their own like stats, in one reaction fetch and one identity fetch.
    pub async fn event_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<EventView> {
        let event = match self
            .content
            .fetch_item(ContentRef::new(ContentKind::Event, id))
            .await?
        {
            Some(crate::models::ContentItem::Event(event)) => event,
            _ => return Err(AppError::NotFound("event not found".to_string())),
        };

        let participant_ids = self.content.participants(event.id).await?;
        let comments = self
            .reactions
            .comments_for_target(
                ContentRef::new(ContentKind::Event, event.id),
                Some(ContentStatus::Approved),
            )
            .await?;

        let event_target = ReactionTarget::new(TargetKind::Event, event.id);
        let mut targets = vec![event_target];
        targets.extend(comments.iter().map(|c| ReactionTarget::comment(c.id)));
        let likes = LikeIndex::build(self.reactions.likes_for_targets(&targets).await?);

        let mut ids = vec![event.author_id];
        ids.extend(event.reviewed_by);
        ids.extend(event.winner);
        ids.extend(participant_ids.iter().copied());
        ids.extend(comments.iter().map(|c| c.author_id));
        let profiles = self.profiles(ids).await?;

        let participants = participant_ids
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect();
        let comment_views = comments
            .into_iter()
            .map(|c| comment_view(c, &profiles, &likes, viewer))
            .collect();

        let stats = likes.stats(event_target, viewer);
        Ok(event_view(
            event,
            &profiles,
            Some(stats),
            Some(participants),
            Some(comment_views),
        ))
    }

    // ------------------------------------------------------------------
    // Comments (admin listing)
    // ------------------------------------------------------------------

    pub async fn all_comments(&self) -> Result<Vec<AdminCommentView>> {
        let comments = self.reactions.list_comments().await?;

        let targets: Vec<ContentRef> = comments.iter().map(|c| c.target).collect();
        let titles = self.content.titles_for(&targets).await?;
        let profiles = self
            .profiles(identity_ids(
                comments.iter().map(|c| (c.author_id, c.reviewed_by)),
            ))
            .await?;

        Ok(comments
            .into_iter()
            .map(|c| AdminCommentView {
                id: c.id,
                content: c.content,
                status: c.status,
                created_at: c.created_at,
                target_kind: c.target.kind,
                target_id: c.target.id,
                target_title: titles.get(&c.target).cloned(),
                author: profiles.get(&c.author_id).cloned(),
                reviewed_by: c.reviewed_by.and_then(|id| profiles.get(&id).cloned()),
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // User profile aggregation
    // ------------------------------------------------------------------

    /// Profile page: the user's APPROVED blogs and projects plus the events
    /// they joined, every item carrying its like stats.
    pub async fn user_profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<UserProfileView> {
        let profile = self
            .identities
            .profile_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let blogs = self
            .content
            .blogs_by_author(profile.id, Some(ContentStatus::Approved))
            .await?;
        let projects = self
            .content
            .projects_by_author(profile.id, Some(ContentStatus::Approved))
            .await?;
        let events = self.content.events_with_participant(profile.id).await?;

        let mut targets: Vec<ReactionTarget> = Vec::new();
        targets.extend(
            blogs
                .iter()
                .map(|b| ReactionTarget::new(TargetKind::Blog, b.id)),
        );
        targets.extend(
            projects
                .iter()
                .map(|p| ReactionTarget::new(TargetKind::Project, p.id)),
        );
        targets.extend(
            events
                .iter()
                .map(|e| ReactionTarget::new(TargetKind::Event, e.id)),
        );
        let likes = LikeIndex::build(self.reactions.likes_for_targets(&targets).await?);

        let mut ids = identity_ids(blogs.iter().map(|b| (b.author_id, b.reviewed_by)));
        ids.extend(identity_ids(
            projects.iter().map(|p| (p.author_id, p.reviewed_by)),
        ));
        ids.extend(identity_ids(
            events.iter().map(|e| (e.author_id, e.reviewed_by)),
        ));
        ids.extend(events.iter().filter_map(|e| e.winner));
        let profiles = self.profiles(ids).await?;

        let blogs = blogs
            .into_iter()
            .map(|b| {
                let stats = likes.stats(ReactionTarget::new(TargetKind::Blog, b.id), viewer);
                blog_view(b, &profiles, Some(stats))
            })
            .collect();
        let projects = projects
            .into_iter()
            .map(|p| {
                let stats = likes.stats(ReactionTarget::new(TargetKind::Project, p.id), viewer);
                project_view(p, &profiles, Some(stats))
            })
            .collect();
        let events = events
            .into_iter()
            .map(|e| {
                let stats = likes.stats(ReactionTarget::new(TargetKind::Event, e.id), viewer);
                event_view(e, &profiles, Some(stats), None, None)
            })
            .collect();

        Ok(UserProfileView {
            profile,
            blogs,
            projects,
            events,
        })
    }
}

/// Collect author + reviewer ids from `(author_id, reviewed_by)` pairs.
fn identity_ids(pairs: impl Iterator<Item = (Uuid, Option<Uuid>)>) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for (author, reviewer) in pairs {
        ids.push(author);
        if let Some(reviewer) = reviewer {
            ids.push(reviewer);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn like_row(author: Uuid, target: ReactionTarget) -> Like {
        Like {
            id: Uuid::new_v4(),
            author_id: author,
            target,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_like_index_counts_per_target() {
        let blog = ReactionTarget::new(TargetKind::Blog, Uuid::new_v4());
        let event = ReactionTarget::new(TargetKind::Event, Uuid::new_v4());
        let likes = vec![
            like_row(Uuid::new_v4(), blog),
            like_row(Uuid::new_v4(), blog),
            like_row(Uuid::new_v4(), event),
        ];

        let index = LikeIndex::build(likes);
        assert_eq!(index.count(blog), 2);
        assert_eq!(index.count(event), 1);
        assert_eq!(
            index.count(ReactionTarget::new(TargetKind::Project, Uuid::new_v4())),
            0
        );
    }

    #[test]
    fn test_viewer_flag_is_viewer_relative() {
        let target = ReactionTarget::new(TargetKind::Event, Uuid::new_v4());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let index = LikeIndex::build(vec![like_row(alice, target)]);

        assert!(index.viewer_has_liked(target, Some(alice)));
        assert!(!index.viewer_has_liked(target, Some(bob)));
    }

    #[test]
    fn test_unauthenticated_viewer_never_has_liked() {
        let target = ReactionTarget::new(TargetKind::Blog, Uuid::new_v4());
        let index = LikeIndex::build(vec![like_row(Uuid::new_v4(), target)]);

        assert!(!index.viewer_has_liked(target, None));
        assert_eq!(index.count(target), 1);
    }

    #[test]
    fn test_same_kind_different_ids_do_not_collide() {
        let a = ReactionTarget::new(TargetKind::Blog, Uuid::new_v4());
        let b = ReactionTarget::new(TargetKind::Blog, Uuid::new_v4());
        let index = LikeIndex::build(vec![like_row(Uuid::new_v4(), a)]);

        assert_eq!(index.count(a), 1);
        assert_eq!(index.count(b), 0);
    }
}
