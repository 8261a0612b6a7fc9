/// Like handlers
///
/// `POST /likes/{kind}/{id}` and `DELETE /likes/{kind}/{id}` where `kind` is
/// one of event, project, blog, comment.
use crate::error::{AppError, Result};
use crate::models::{AuthUser, ReactionTarget, TargetKind};
use crate::response::ApiResponse;
use crate::services::ReactionService;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/likes")
            .route("/{kind}/{target_id}", web::post().to(like))
            .route("/{kind}/{target_id}", web::delete().to(unlike)),
    );
}

fn parse_target(kind: &str, id: uuid::Uuid) -> Result<ReactionTarget> {
    let kind: TargetKind = kind.parse().map_err(AppError::Validation)?;
    Ok(ReactionTarget::new(kind, id))
}

async fn like(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<(String, uuid::Uuid)>,
) -> Result<HttpResponse> {
    let (kind, target_id) = path.into_inner();
    let target = parse_target(&kind, target_id)?;

    let like = ReactionService::new(state.content.as_ref(), state.reactions.as_ref())
        .like(&caller, target)
        .await?;

    Ok(ApiResponse::created(
        format!("{} liked successfully", target.kind),
        like,
    ))
}

async fn unlike(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<(String, uuid::Uuid)>,
) -> Result<HttpResponse> {
    let (kind, target_id) = path.into_inner();
    let target = parse_target(&kind, target_id)?;

    ReactionService::new(state.content.as_ref(), state.reactions.as_ref())
        .unlike(&caller, target)
        .await?;

    Ok(ApiResponse::ok(
        format!("{} unliked successfully", target.kind),
        serde_json::json!({}),
    ))
}
