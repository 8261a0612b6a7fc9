/// Blog handlers
use crate::error::Result;
use crate::middleware::permissions::require_admin;
use crate::middleware::MaybeUser;
use crate::models::{AuthUser, BlogPatch, ContentKind, ContentRef, ContentStatus, NewBlog};
use crate::response::ApiResponse;
use crate::services::{BlogService, ModerationService, ViewAssembler};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blogs")
            .route("", web::post().to(create_blog))
            .route("", web::get().to(get_all_blogs))
            .route("/approved", web::get().to(get_approved_blogs))
            .route("/{blog_id}", web::get().to(get_blog))
            .route("/{blog_id}", web::patch().to(update_blog))
            .route("/{blog_id}", web::delete().to(delete_blog))
            .route("/{blog_id}/review", web::patch().to(review_blog)),
    );
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ContentStatus,
}

async fn create_blog(
    state: web::Data<AppState>,
    caller: AuthUser,
    req: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let blog = BlogService::new(state.content.as_ref())
        .create(
            &caller,
            NewBlog {
                author_id: caller.id,
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;

    Ok(ApiResponse::created("Blog created", blog))
}

async fn get_approved_blogs(state: web::Data<AppState>) -> Result<HttpResponse> {
    let blogs = assembler(&state).approved_blogs().await?;
    Ok(ApiResponse::ok("Approved blogs", blogs))
}

/// Admin listing: every blog regardless of status.
async fn get_all_blogs(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse> {
    require_admin(&caller)?;
    let blogs = assembler(&state).all_blogs().await?;
    Ok(ApiResponse::ok("All blogs", blogs))
}

async fn get_blog(
    state: web::Data<AppState>,
    blog_id: web::Path<Uuid>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let blog = assembler(&state)
        .blog_detail(*blog_id, viewer.viewer_id())
        .await?;
    Ok(ApiResponse::ok("Blog found", blog))
}

async fn update_blog(
    state: web::Data<AppState>,
    caller: AuthUser,
    blog_id: web::Path<Uuid>,
    req: web::Json<UpdateBlogRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let blog = BlogService::new(state.content.as_ref())
        .update(
            &caller,
            *blog_id,
            BlogPatch {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;

    Ok(ApiResponse::ok("Blog updated", blog))
}

async fn delete_blog(
    state: web::Data<AppState>,
    caller: AuthUser,
    blog_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    BlogService::new(state.content.as_ref())
        .delete(&caller, *blog_id)
        .await?;
    Ok(ApiResponse::ok("Blog deleted", serde_json::json!({})))
}

async fn review_blog(
    state: web::Data<AppState>,
    caller: AuthUser,
    blog_id: web::Path<Uuid>,
    req: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let blog = ModerationService::new(state.content.as_ref(), state.reactions.as_ref())
        .review_content(
            &caller,
            ContentRef::new(ContentKind::Blog, *blog_id),
            req.status,
        )
        .await?;

    Ok(ApiResponse::ok("Blog reviewed successfully", blog))
}

fn assembler(state: &web::Data<AppState>) -> ViewAssembler<'_> {
    ViewAssembler::new(
        state.content.as_ref(),
        state.reactions.as_ref(),
        state.identities.as_ref(),
    )
}
