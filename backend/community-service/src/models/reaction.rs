use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::content::{ContentKind, ContentRef, ContentStatus};

/// Everything a Like can point at: the three content kinds plus comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "target_kind", rename_all = "UPPERCASE")]
pub enum TargetKind {
    Event,
    Project,
    Blog,
    Comment,
}

impl sqlx::postgres::PgHasArrayType for TargetKind {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_target_kind")
    }
}

impl From<ContentKind> for TargetKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Event => TargetKind::Event,
            ContentKind::Project => TargetKind::Project,
            ContentKind::Blog => TargetKind::Blog,
        }
    }
}

impl TargetKind {
    /// `None` for comment targets, which live outside the content tables.
    pub fn as_content_kind(self) -> Option<ContentKind> {
        match self {
            TargetKind::Event => Some(ContentKind::Event),
            TargetKind::Project => Some(ContentKind::Project),
            TargetKind::Blog => Some(ContentKind::Blog),
            TargetKind::Comment => None,
        }
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "event" => Ok(TargetKind::Event),
            "project" => Ok(TargetKind::Project),
            "blog" => Ok(TargetKind::Blog),
            "comment" => Ok(TargetKind::Comment),
            other => Err(format!("unknown like target kind: {other}")),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Event => write!(f, "event"),
            TargetKind::Project => write!(f, "project"),
            TargetKind::Blog => write!(f, "blog"),
            TargetKind::Comment => write!(f, "comment"),
        }
    }
}

/// Tagged reference to exactly one likeable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReactionTarget {
    #[serde(rename = "targetKind")]
    #[sqlx(rename = "target_kind")]
    pub kind: TargetKind,
    #[serde(rename = "targetId")]
    #[sqlx(rename = "target_id")]
    pub id: Uuid,
}

impl ReactionTarget {
    pub fn new(kind: TargetKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn comment(id: Uuid) -> Self {
        Self::new(TargetKind::Comment, id)
    }
}

impl From<ContentRef> for ReactionTarget {
    fn from(target: ContentRef) -> Self {
        Self::new(target.kind.into(), target.id)
    }
}

/// A Like row. Created and destroyed atomically by its author, never updated.
/// At most one row exists per `(author_id, target)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub author_id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub target: ReactionTarget,
    pub created_at: DateTime<Utc>,
}

/// A Comment row. Subject to the same moderation lifecycle as content.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub target: ContentRef,
    pub status: ContentStatus,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a comment. Status always starts PENDING.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: Uuid,
    pub target: ContentRef,
    pub content: String,
}
