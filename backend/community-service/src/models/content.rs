use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Moderation status shared by every content kind and by comments.
///
/// PENDING is the initial state; APPROVED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "content_status", rename_all = "UPPERCASE")]
pub enum ContentStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStatus::Pending => write!(f, "PENDING"),
            ContentStatus::Approved => write!(f, "APPROVED"),
            ContentStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// The three moderated content kinds. Comments target one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "target_kind", rename_all = "UPPERCASE")]
pub enum ContentKind {
    Event,
    Project,
    Blog,
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "event" => Ok(ContentKind::Event),
            "project" => Ok(ContentKind::Project),
            "blog" => Ok(ContentKind::Blog),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Event => write!(f, "event"),
            ContentKind::Project => write!(f, "project"),
            ContentKind::Blog => write!(f, "blog"),
        }
    }
}

/// Tagged reference to exactly one content item: always one `(kind, id)`
/// pair, enforced by the type system rather than a set of nullable foreign
/// keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentRef {
    #[serde(rename = "targetKind")]
    #[sqlx(rename = "target_kind")]
    pub kind: ContentKind,
    #[serde(rename = "targetId")]
    #[sqlx(rename = "target_id")]
    pub id: Uuid,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

/// Event category, as published on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "event_type", rename_all = "UPPERCASE")]
pub enum EventType {
    Quiz,
    Dsa,
    Hackathon,
    Techfest,
    Others,
}

/// Blog entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    pub reviewed_by: Option<Uuid>,
    pub published_at: DateTime<Utc>,
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub source_code_link: String,
    pub deployed_link: Option<String>,
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    pub reviewed_by: Option<Uuid>,
    pub published_at: DateTime<Utc>,
}

/// Event entity. Participants live in a separate association table and are
/// loaded on demand.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub event_image: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub venue: String,
    pub event_type: EventType,
    pub tags: Vec<String>,
    pub winner: Option<Uuid>,
    pub status: ContentStatus,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One moderated content item of any kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentItem {
    Blog(Blog),
    Project(Project),
    Event(Event),
}

impl ContentItem {
    pub fn id(&self) -> Uuid {
        match self {
            ContentItem::Blog(b) => b.id,
            ContentItem::Project(p) => p.id,
            ContentItem::Event(e) => e.id,
        }
    }

    pub fn author_id(&self) -> Uuid {
        match self {
            ContentItem::Blog(b) => b.author_id,
            ContentItem::Project(p) => p.author_id,
            ContentItem::Event(e) => e.author_id,
        }
    }

    pub fn status(&self) -> ContentStatus {
        match self {
            ContentItem::Blog(b) => b.status,
            ContentItem::Project(p) => p.status,
            ContentItem::Event(e) => e.status,
        }
    }

    pub fn reviewed_by(&self) -> Option<Uuid> {
        match self {
            ContentItem::Blog(b) => b.reviewed_by,
            ContentItem::Project(p) => p.reviewed_by,
            ContentItem::Event(e) => e.reviewed_by,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Blog(_) => ContentKind::Blog,
            ContentItem::Project(_) => ContentKind::Project,
            ContentItem::Event(_) => ContentKind::Event,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Blog(b) => &b.title,
            ContentItem::Project(p) => &p.title,
            ContentItem::Event(e) => &e.title,
        }
    }

    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.kind(), self.id())
    }
}

/// Insert payload for a blog. Status always starts PENDING.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Insert payload for a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub source_code_link: String,
    pub deployed_link: Option<String>,
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
}

/// Insert payload for an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub event_image: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub venue: String,
    pub event_type: EventType,
    pub tags: Vec<String>,
}

/// Author-editable blog fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Author-editable project fields.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source_code_link: Option<String>,
    pub deployed_link: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Editable event fields, including the winner and the image URL produced by
/// the blob collaborator.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_image: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub venue: Option<String>,
    pub event_type: Option<EventType>,
    pub tags: Option<Vec<String>>,
    pub winner: Option<Uuid>,
}

/// Normalize a tag list: trim entries, drop empties, keep first occurrence.
/// Tags behave as an ordered set.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
