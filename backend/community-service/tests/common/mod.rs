//! In-memory store doubles for integration tests.
//!
//! Mirror the Postgres semantics (conditional review updates, like
//! uniqueness, cascade deletion) and count batch calls so tests can assert
//! the view assembler stays free of N+1 lookups.

use async_trait::async_trait;
use chrono::Utc;
use community_service::db::{ContentStore, IdentityDirectory, ReactionStore};
use community_service::error::{AppError, Result};
use community_service::models::{
    AuthUser, Blog, BlogPatch, Comment, ContentItem, ContentKind, ContentRef, ContentStatus,
    Event, EventPatch, EventType, Like, NewBlog, NewComment, NewEvent, NewProject, Project,
    ProjectPatch, ReactionTarget, Role, TargetKind, UserProfile,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    blogs: HashMap<Uuid, Blog>,
    projects: HashMap<Uuid, Project>,
    events: HashMap<Uuid, Event>,
    participants: HashMap<Uuid, Vec<Uuid>>,
    comments: HashMap<Uuid, Comment>,
    likes: Vec<Like>,
    users: HashMap<Uuid, UserProfile>,
}

/// One struct implements all three store traits; a delete can therefore
/// cascade across content and reactions exactly like the Postgres
/// transaction does.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    reaction_batch_calls: AtomicUsize,
    identity_batch_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a user in the identity directory and return the auth context
    /// the middleware would have produced.
    pub fn seed_user(&self, role: Role) -> AuthUser {
        let id = Uuid::new_v4();
        let simple = id.simple().to_string();
        let short = &simple[..8];
        let profile = UserProfile {
            id,
            fullname: format!("User {short}"),
            username: format!("user-{short}"),
            avatar: None,
            email: format!("{short}@example.com"),
            role,
        };
        self.inner.lock().unwrap().users.insert(id, profile);
        AuthUser { id, role }
    }

    pub fn reaction_batch_calls(&self) -> usize {
        self.reaction_batch_calls.load(Ordering::SeqCst)
    }

    pub fn identity_batch_calls(&self) -> usize {
        self.identity_batch_calls.load(Ordering::SeqCst)
    }

    pub fn reset_batch_counters(&self) {
        self.reaction_batch_calls.store(0, Ordering::SeqCst);
        self.identity_batch_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog> {
        let blog = Blog {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            title: new.title,
            content: new.content,
            tags: new.tags,
            status: ContentStatus::Pending,
            reviewed_by: None,
            published_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .blogs
            .insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.blogs.get_mut(&id).map(|blog| {
            if let Some(title) = patch.title {
                blog.title = title;
            }
            if let Some(content) = patch.content {
                blog.content = content;
            }
            if let Some(tags) = patch.tags {
                blog.tags = tags;
            }
            blog.clone()
        }))
    }

    async fn list_blogs(&self, status: Option<ContentStatus>) -> Result<Vec<Blog>> {
        let inner = self.inner.lock().unwrap();
        let mut blogs: Vec<Blog> = inner
            .blogs
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        blogs.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(blogs)
    }

    async fn blogs_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Blog>> {
        Ok(self
            .list_blogs(status)
            .await?
            .into_iter()
            .filter(|b| b.author_id == author_id)
            .collect())
    }

    async fn insert_project(&self, new: NewProject) -> Result<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            title: new.title,
            description: new.description,
            source_code_link: new.source_code_link,
            deployed_link: new.deployed_link,
            tech_stack: new.tech_stack,
            tags: new.tags,
            status: ContentStatus::Pending,
            reviewed_by: None,
            published_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .projects
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.projects.get_mut(&id).map(|project| {
            if let Some(title) = patch.title {
                project.title = title;
            }
            if let Some(description) = patch.description {
                project.description = description;
            }
            if let Some(link) = patch.source_code_link {
                project.source_code_link = link;
            }
            if let Some(link) = patch.deployed_link {
                project.deployed_link = Some(link);
            }
            if let Some(stack) = patch.tech_stack {
                project.tech_stack = stack;
            }
            if let Some(tags) = patch.tags {
                project.tags = tags;
            }
            project.clone()
        }))
    }

    async fn list_projects(&self, status: Option<ContentStatus>) -> Result<Vec<Project>> {
        let inner = self.inner.lock().unwrap();
        let mut projects: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(projects)
    }

    async fn projects_by_author(
        &self,
        author_id: Uuid,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Project>> {
        Ok(self
            .list_projects(status)
            .await?
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .collect())
    }

    async fn insert_event(&self, new: NewEvent) -> Result<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            title: new.title,
            description: new.description,
            event_image: new.event_image,
            date: new.date,
            duration_minutes: new.duration_minutes,
            venue: new.venue,
            event_type: new.event_type,
            tags: new.tags,
            winner: None,
            status: ContentStatus::Pending,
            reviewed_by: None,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.events.get_mut(&id).map(|event| {
            if let Some(title) = patch.title {
                event.title = title;
            }
            if let Some(description) = patch.description {
                event.description = description;
            }
            if let Some(image) = patch.event_image {
                event.event_image = Some(image);
            }
            if let Some(date) = patch.date {
                event.date = date;
            }
            if let Some(duration) = patch.duration_minutes {
                event.duration_minutes = duration;
            }
            if let Some(venue) = patch.venue {
                event.venue = venue;
            }
            if let Some(event_type) = patch.event_type {
                event.event_type = event_type;
            }
            if let Some(tags) = patch.tags {
                event.tags = tags;
            }
            if let Some(winner) = patch.winner {
                event.winner = Some(winner);
            }
            event.clone()
        }))
    }

    async fn list_events(&self, status: Option<ContentStatus>) -> Result<Vec<Event>> {
        let inner = self.inner.lock().unwrap();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(events)
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.events.contains_key(&event_id) {
            return Ok(false);
        }
        let participants = inner.participants.entry(event_id).or_default();
        if !participants.contains(&user_id) {
            participants.push(user_id);
        }
        Ok(true)
    }

    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.events.contains_key(&event_id) {
            return Ok(false);
        }
        if let Some(participants) = inner.participants.get_mut(&event_id) {
            participants.retain(|id| *id != user_id);
        }
        Ok(true)
    }

    async fn participants(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.participants.get(&event_id).cloned().unwrap_or_default())
    }

    async fn events_with_participant(&self, user_id: Uuid) -> Result<Vec<Event>> {
        let inner = self.inner.lock().unwrap();
        let mut events: Vec<Event> = inner
            .participants
            .iter()
            .filter(|(_, users)| users.contains(&user_id))
            .filter_map(|(event_id, _)| inner.events.get(event_id).cloned())
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(events)
    }

    async fn fetch_item(&self, target: ContentRef) -> Result<Option<ContentItem>> {
        let inner = self.inner.lock().unwrap();
        Ok(match target.kind {
            ContentKind::Blog => inner.blogs.get(&target.id).cloned().map(ContentItem::Blog),
            ContentKind::Project => inner
                .projects
                .get(&target.id)
                .cloned()
                .map(ContentItem::Project),
            ContentKind::Event => inner
                .events
                .get(&target.id)
                .cloned()
                .map(ContentItem::Event),
        })
    }

    async fn review_item(
        &self,
        target: ContentRef,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<ContentItem>> {
        let mut inner = self.inner.lock().unwrap();
        macro_rules! conditional_review {
            ($map:expr, $variant:expr) => {
                match $map.get_mut(&target.id) {
                    Some(item) if item.status == ContentStatus::Pending => {
                        item.status = decision;
                        item.reviewed_by = Some(reviewer_id);
                        Some($variant(item.clone()))
                    }
                    _ => None,
                }
            };
        }
        Ok(match target.kind {
            ContentKind::Blog => conditional_review!(inner.blogs, ContentItem::Blog),
            ContentKind::Project => conditional_review!(inner.projects, ContentItem::Project),
            ContentKind::Event => conditional_review!(inner.events, ContentItem::Event),
        })
    }

    async fn delete_item(&self, target: ContentRef) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();

        let removed = match target.kind {
            ContentKind::Blog => inner.blogs.remove(&target.id).is_some(),
            ContentKind::Project => inner.projects.remove(&target.id).is_some(),
            ContentKind::Event => {
                inner.participants.remove(&target.id);
                inner.events.remove(&target.id).is_some()
            }
        };
        if !removed {
            return Ok(false);
        }

        let comment_ids: Vec<Uuid> = inner
            .comments
            .values()
            .filter(|c| c.target == target)
            .map(|c| c.id)
            .collect();
        for id in &comment_ids {
            inner.comments.remove(id);
        }

        let like_kind = TargetKind::from(target.kind);
        inner.likes.retain(|like| {
            let on_item = like.target.kind == like_kind && like.target.id == target.id;
            let on_comment = like.target.kind == TargetKind::Comment
                && comment_ids.contains(&like.target.id);
            !on_item && !on_comment
        });

        Ok(true)
    }

    async fn titles_for(&self, targets: &[ContentRef]) -> Result<HashMap<ContentRef, String>> {
        let inner = self.inner.lock().unwrap();
        let mut titles = HashMap::new();
        for target in targets {
            let title = match target.kind {
                ContentKind::Blog => inner.blogs.get(&target.id).map(|b| b.title.clone()),
                ContentKind::Project => inner.projects.get(&target.id).map(|p| p.title.clone()),
                ContentKind::Event => inner.events.get(&target.id).map(|e| e.title.clone()),
            };
            if let Some(title) = title {
                titles.insert(*target, title);
            }
        }
        Ok(titles)
    }
}

#[async_trait]
impl ReactionStore for MemoryStore {
    async fn insert_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<Like> {
        let mut inner = self.inner.lock().unwrap();
        let duplicate = inner
            .likes
            .iter()
            .any(|l| l.author_id == author_id && l.target == target);
        if duplicate {
            return Err(AppError::Validation(format!(
                "{} already liked",
                target.kind
            )));
        }

        let like = Like {
            id: Uuid::new_v4(),
            author_id,
            target,
            created_at: Utc::now(),
        };
        inner.likes.push(like.clone());
        Ok(like)
    }

    async fn delete_like(&self, author_id: Uuid, target: ReactionTarget) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.likes.len();
        inner
            .likes
            .retain(|l| !(l.author_id == author_id && l.target == target));
        Ok(inner.likes.len() < before)
    }

    async fn likes_for_targets(&self, targets: &[ReactionTarget]) -> Result<Vec<Like>> {
        self.reaction_batch_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .likes
            .iter()
            .filter(|l| targets.contains(&l.target))
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, new: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            content: new.content,
            target: new.target,
            status: ContentStatus::Pending,
            reviewed_by: None,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .comments
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn fetch_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.inner.lock().unwrap().comments.get(&id).cloned())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.comments.remove(&id).is_none() {
            return Ok(false);
        }
        inner
            .likes
            .retain(|l| !(l.target.kind == TargetKind::Comment && l.target.id == id));
        Ok(true)
    }

    async fn review_comment(
        &self,
        id: Uuid,
        decision: ContentStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<Comment>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(match inner.comments.get_mut(&id) {
            Some(comment) if comment.status == ContentStatus::Pending => {
                comment.status = decision;
                comment.reviewed_by = Some(reviewer_id);
                Some(comment.clone())
            }
            _ => None,
        })
    }

    async fn comments_for_target(
        &self,
        target: ContentRef,
        status: Option<ContentStatus>,
    ) -> Result<Vec<Comment>> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.target == target && status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner.comments.values().cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl IdentityDirectory for MemoryStore {
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserProfile>> {
        self.identity_batch_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| inner.users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }
}

// ---------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------

pub fn new_blog(author_id: Uuid) -> NewBlog {
    NewBlog {
        author_id,
        title: "Getting started with async Rust".to_string(),
        content: "Futures, executors, and where people trip up.".to_string(),
        tags: vec!["rust".to_string(), "async".to_string()],
    }
}

pub fn new_project(author_id: Uuid) -> NewProject {
    NewProject {
        author_id,
        title: "campus-compass".to_string(),
        description: "Indoor navigation for the campus buildings.".to_string(),
        source_code_link: "https://github.com/example/campus-compass".to_string(),
        deployed_link: None,
        tech_stack: vec!["rust".to_string(), "postgres".to_string()],
        tags: vec!["navigation".to_string()],
    }
}

pub fn new_event(author_id: Uuid) -> NewEvent {
    NewEvent {
        author_id,
        title: "Autumn Hackathon".to_string(),
        description: "24 hours, any stack, ship something.".to_string(),
        event_image: None,
        date: Utc::now() + chrono::Duration::days(14),
        duration_minutes: 24 * 60,
        venue: "Main auditorium".to_string(),
        event_type: EventType::Hackathon,
        tags: vec!["hackathon".to_string()],
    }
}
