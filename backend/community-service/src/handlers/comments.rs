/// Comment handlers
use crate::error::Result;
use crate::middleware::permissions::require_admin;
use crate::models::{AuthUser, ContentKind, ContentRef, ContentStatus};
use crate::response::ApiResponse;
use crate::services::{ModerationService, ReactionService, ViewAssembler};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("", web::post().to(create_comment))
            .route("", web::get().to(get_all_comments))
            .route("/{comment_id}", web::delete().to(delete_comment))
            .route("/{comment_id}/review", web::patch().to(review_comment)),
    );
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub target_kind: ContentKind,
    pub target_id: Uuid,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ContentStatus,
}

async fn create_comment(
    state: web::Data<AppState>,
    caller: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let comment = ReactionService::new(state.content.as_ref(), state.reactions.as_ref())
        .comment(
            &caller,
            ContentRef::new(req.target_kind, req.target_id),
            req.content,
        )
        .await?;

    Ok(ApiResponse::created("Comment created successfully", comment))
}

async fn delete_comment(
    state: web::Data<AppState>,
    caller: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ReactionService::new(state.content.as_ref(), state.reactions.as_ref())
        .delete_comment(&caller, *comment_id)
        .await?;
    Ok(ApiResponse::ok(
        "Comment deleted successfully",
        serde_json::json!({}),
    ))
}

async fn review_comment(
    state: web::Data<AppState>,
    caller: AuthUser,
    comment_id: web::Path<Uuid>,
    req: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let comment = ModerationService::new(state.content.as_ref(), state.reactions.as_ref())
        .review_comment(&caller, *comment_id, req.status)
        .await?;

    Ok(ApiResponse::ok("Comment reviewed successfully", comment))
}

/// Admin moderation console: every comment with its target title.
async fn get_all_comments(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse> {
    require_admin(&caller)?;
    let comments = ViewAssembler::new(
        state.content.as_ref(),
        state.reactions.as_ref(),
        state.identities.as_ref(),
    )
    .all_comments()
    .await?;

    Ok(ApiResponse::ok("All comments", comments))
}
