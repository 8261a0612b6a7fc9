/// Data models for community-service
///
/// - `content`: Blog, Project, Event entities and their moderation fields
/// - `reaction`: Like and Comment rows with tagged-union targets
/// - `user`: identity projections supplied by the identity directory
pub mod content;
pub mod reaction;
pub mod user;

pub use content::{
    Blog, BlogPatch, ContentItem, ContentKind, ContentRef, ContentStatus, Event, EventPatch,
    EventType, NewBlog, NewEvent, NewProject, Project, ProjectPatch,
};
pub use reaction::{Comment, Like, NewComment, ReactionTarget, TargetKind};
pub use user::{AuthUser, Role, UserProfile};
