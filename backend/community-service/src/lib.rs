/// Community Service Library
///
/// Backend for the community platform: blogs, projects, and events published
/// by members, gated by an admin moderation workflow, with likes and comments
/// attaching polymorphically to any of them.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: content, reaction, and identity data structures
/// - `services`: moderation state machine, write operations, view assembly
/// - `db`: store traits and Postgres repositories
/// - `middleware`: bearer-token auth and capability checks
/// - `storage`: blob storage collaborator
/// - `response`: the stable response envelope
/// - `error`: error types and handling
/// - `config`: configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};

use db::{ContentStore, IdentityDirectory, ReactionStore};
use std::sync::Arc;
use storage::MediaStorage;

/// Shared per-process state. Requests themselves are stateless; the stores
/// are the only serialization point.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentStore>,
    pub reactions: Arc<dyn ReactionStore>,
    pub identities: Arc<dyn IdentityDirectory>,
    pub media: Arc<dyn MediaStorage>,
}

impl AppState {
    pub fn new(
        content: Arc<dyn ContentStore>,
        reactions: Arc<dyn ReactionStore>,
        identities: Arc<dyn IdentityDirectory>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            content,
            reactions,
            identities,
            media,
        }
    }
}
