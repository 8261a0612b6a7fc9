/// Event handlers
use crate::error::{AppError, Result};
use crate::middleware::permissions::{can_manage_event, require_admin};
use crate::middleware::MaybeUser;
use crate::models::{
    AuthUser, ContentKind, ContentRef, ContentStatus, EventPatch, EventType, NewEvent,
};
use crate::response::ApiResponse;
use crate::services::{EventService, ModerationService, ViewAssembler};
use crate::AppState;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(create_event))
            .route("", web::get().to(get_all_events))
            .route("/approved", web::get().to(get_approved_events))
            .route("/{event_id}", web::get().to(get_event))
            .route("/{event_id}", web::patch().to(update_event))
            .route("/{event_id}", web::delete().to(delete_event))
            .route("/{event_id}/review", web::patch().to(review_event))
            .route("/{event_id}/join", web::post().to(join_event))
            .route("/{event_id}/leave", web::post().to(leave_event))
            .route("/{event_id}/image", web::put().to(upload_event_image)),
    );
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub date: DateTime<Utc>,
    #[validate(range(min = 1, message = "durationMinutes must be positive"))]
    pub duration_minutes: i32,
    #[validate(length(min = 1, message = "venue is required"))]
    pub venue: String,
    pub event_type: EventType,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub venue: Option<String>,
    pub event_type: Option<EventType>,
    pub tags: Option<Vec<String>>,
    pub winner: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ContentStatus,
}

async fn create_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    req: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let event = EventService::new(state.content.as_ref())
        .create(
            &caller,
            NewEvent {
                author_id: caller.id,
                title: req.title,
                description: req.description,
                event_image: None,
                date: req.date,
                duration_minutes: req.duration_minutes,
                venue: req.venue,
                event_type: req.event_type,
                tags: req.tags,
            },
        )
        .await?;

    Ok(ApiResponse::created("Event created successfully", event))
}

async fn get_approved_events(state: web::Data<AppState>) -> Result<HttpResponse> {
    let events = assembler(&state).approved_events().await?;
    Ok(ApiResponse::ok("Approved events", events))
}

/// Admin listing: every event regardless of status.
async fn get_all_events(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse> {
    require_admin(&caller)?;
    let events = assembler(&state).all_events().await?;
    Ok(ApiResponse::ok("All events", events))
}

/// Event detail: participants, winner, and the approved comments with their
/// own like stats.
async fn get_event(
    state: web::Data<AppState>,
    event_id: web::Path<Uuid>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let event = assembler(&state)
        .event_detail(*event_id, viewer.viewer_id())
        .await?;
    Ok(ApiResponse::ok("Event found", event))
}

async fn update_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
    req: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let event = EventService::new(state.content.as_ref())
        .update(
            &caller,
            *event_id,
            EventPatch {
                title: req.title,
                description: req.description,
                event_image: None,
                date: req.date,
                duration_minutes: req.duration_minutes,
                venue: req.venue,
                event_type: req.event_type,
                tags: req.tags,
                winner: req.winner,
            },
        )
        .await?;

    Ok(ApiResponse::ok("Event updated successfully", event))
}

async fn delete_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    EventService::new(state.content.as_ref())
        .delete(&caller, *event_id)
        .await?;
    Ok(ApiResponse::ok(
        "Event deleted successfully",
        serde_json::json!({}),
    ))
}

async fn review_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
    req: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let event = ModerationService::new(state.content.as_ref(), state.reactions.as_ref())
        .review_content(
            &caller,
            ContentRef::new(ContentKind::Event, *event_id),
            req.status,
        )
        .await?;

    Ok(ApiResponse::ok("Event reviewed successfully", event))
}

async fn join_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    EventService::new(state.content.as_ref())
        .join(&caller, *event_id)
        .await?;
    Ok(ApiResponse::ok(
        "You have successfully joined the event",
        serde_json::json!({}),
    ))
}

async fn leave_event(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    EventService::new(state.content.as_ref())
        .leave(&caller, *event_id)
        .await?;
    Ok(ApiResponse::ok(
        "You have successfully left the event",
        serde_json::json!({}),
    ))
}

/// Raw image upload. Bytes go to the blob collaborator; only the returned
/// public URL lands on the event row.
async fn upload_event_image(
    state: web::Data<AppState>,
    caller: AuthUser,
    event_id: web::Path<Uuid>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Content-Type header is required".to_string()))?;

    let mime: mime::Mime = content_type
        .parse()
        .map_err(|_| AppError::Validation("invalid Content-Type".to_string()))?;
    if mime.type_() != mime::IMAGE {
        return Err(AppError::Validation("expected an image upload".to_string()));
    }

    let service = EventService::new(state.content.as_ref());
    let event = service.fetch(*event_id).await?;
    can_manage_event(&caller, event.author_id())?;

    let key = format!("events/{}/{}.{}", event_id, Uuid::new_v4(), mime.subtype());
    let url = state.media.upload(&key, content_type, body.to_vec()).await?;

    let updated = service
        .update(
            &caller,
            *event_id,
            EventPatch {
                event_image: Some(url),
                ..Default::default()
            },
        )
        .await?;

    Ok(ApiResponse::ok("Event image updated", updated))
}

fn assembler(state: &web::Data<AppState>) -> ViewAssembler<'_> {
    ViewAssembler::new(
        state.content.as_ref(),
        state.reactions.as_ref(),
        state.identities.as_ref(),
    )
}
