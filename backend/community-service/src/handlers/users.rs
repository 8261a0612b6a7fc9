/// User profile handlers
use crate::error::Result;
use crate::middleware::MaybeUser;
use crate::response::ApiResponse;
use crate::services::ViewAssembler;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users").route("/{username}/profile", web::get().to(get_user_profile)),
    );
}

/// Public profile: identity projection plus the user's approved work and
/// joined events, each with viewer-relative like stats.
async fn get_user_profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let profile = ViewAssembler::new(
        state.content.as_ref(),
        state.reactions.as_ref(),
        state.identities.as_ref(),
    )
    .user_profile(&username, viewer.viewer_id())
    .await?;

    Ok(ApiResponse::ok("User profile", profile))
}
