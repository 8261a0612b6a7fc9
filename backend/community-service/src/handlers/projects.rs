/// Project handlers
use crate::error::Result;
use crate::middleware::permissions::require_admin;
use crate::middleware::MaybeUser;
use crate::models::{
    AuthUser, ContentKind, ContentRef, ContentStatus, NewProject, ProjectPatch,
};
use crate::response::ApiResponse;
use crate::services::{ModerationService, ProjectService, ViewAssembler};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::post().to(create_project))
            .route("", web::get().to(get_all_projects))
            .route("/approved", web::get().to(get_approved_projects))
            .route("/{project_id}", web::get().to(get_project))
            .route("/{project_id}", web::patch().to(update_project))
            .route("/{project_id}", web::delete().to(delete_project))
            .route("/{project_id}/review", web::patch().to(review_project)),
    );
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(url(message = "sourceCodeLink must be a valid URL"))]
    pub source_code_link: String,
    pub deployed_link: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source_code_link: Option<String>,
    pub deployed_link: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ContentStatus,
}

async fn create_project(
    state: web::Data<AppState>,
    caller: AuthUser,
    req: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let project = ProjectService::new(state.content.as_ref())
        .create(
            &caller,
            NewProject {
                author_id: caller.id,
                title: req.title,
                description: req.description,
                source_code_link: req.source_code_link,
                deployed_link: req.deployed_link,
                tech_stack: req.tech_stack,
                tags: req.tags,
            },
        )
        .await?;

    Ok(ApiResponse::created("Project created", project))
}

async fn get_approved_projects(state: web::Data<AppState>) -> Result<HttpResponse> {
    let projects = assembler(&state).approved_projects().await?;
    Ok(ApiResponse::ok("Approved projects", projects))
}

/// Admin listing: every project regardless of status.
async fn get_all_projects(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse> {
    require_admin(&caller)?;
    let projects = assembler(&state).all_projects().await?;
    Ok(ApiResponse::ok("All projects", projects))
}

async fn get_project(
    state: web::Data<AppState>,
    project_id: web::Path<Uuid>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let project = assembler(&state)
        .project_detail(*project_id, viewer.viewer_id())
        .await?;
    Ok(ApiResponse::ok("Project found", project))
}

async fn update_project(
    state: web::Data<AppState>,
    caller: AuthUser,
    project_id: web::Path<Uuid>,
    req: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let project = ProjectService::new(state.content.as_ref())
        .update(
            &caller,
            *project_id,
            ProjectPatch {
                title: req.title,
                description: req.description,
                source_code_link: req.source_code_link,
                deployed_link: req.deployed_link,
                tech_stack: req.tech_stack,
                tags: req.tags,
            },
        )
        .await?;

    Ok(ApiResponse::ok("Project updated", project))
}

async fn delete_project(
    state: web::Data<AppState>,
    caller: AuthUser,
    project_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ProjectService::new(state.content.as_ref())
        .delete(&caller, *project_id)
        .await?;
    Ok(ApiResponse::ok("Project deleted", serde_json::json!({})))
}

async fn review_project(
    state: web::Data<AppState>,
    caller: AuthUser,
    project_id: web::Path<Uuid>,
    req: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let project = ModerationService::new(state.content.as_ref(), state.reactions.as_ref())
        .review_content(
            &caller,
            ContentRef::new(ContentKind::Project, *project_id),
            req.status,
        )
        .await?;

    Ok(ApiResponse::ok("Project reviewed successfully", project))
}

fn assembler(state: &web::Data<AppState>) -> ViewAssembler<'_> {
    ViewAssembler::new(
        state.content.as_ref(),
        state.reactions.as_ref(),
        state.identities.as_ref(),
    )
}
