use crate::models::{ContentStatus, Event, EventPatch, NewEvent};
use sqlx::PgPool;
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, author_id, title, description, event_image, date, \
     duration_minutes, venue, event_type, tags, winner, status, reviewed_by, created_at";

pub async fn insert_event(pool: &PgPool, new: NewEvent) -> Result<Event, sqlx::Error> {
    let event = sqlx::query_as::<_, Event>(&format!(
        r#"
        INSERT INTO events (author_id, title, description, event_image, date, duration_minutes, venue, event_type, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {EVENT_COLUMNS}
        "#,
    ))
    .bind(new.author_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.event_image)
    .bind(new.date)
    .bind(new.duration_minutes)
    .bind(new.venue)
    .bind(new.event_type)
    .bind(new.tags)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM events
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    patch: EventPatch,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        UPDATE events
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            event_image = COALESCE($3, event_image),
            date = COALESCE($4, date),
            duration_minutes = COALESCE($5, duration_minutes),
            venue = COALESCE($6, venue),
            event_type = COALESCE($7, event_type),
            tags = COALESCE($8, tags),
            winner = COALESCE($9, winner)
        WHERE id = $10
        RETURNING {EVENT_COLUMNS}
        "#,
    ))
    .bind(patch.title)
    .bind(patch.description)
    .bind(patch.event_image)
    .bind(patch.date)
    .bind(patch.duration_minutes)
    .bind(patch.venue)
    .bind(patch.event_type)
    .bind(patch.tags)
    .bind(patch.winner)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Conditional moderation update, PENDING rows only.
pub async fn review_event(
    pool: &PgPool,
    id: Uuid,
    decision: ContentStatus,
    reviewer_id: Uuid,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        UPDATE events
        SET status = $1, reviewed_by = $2
        WHERE id = $3 AND status = 'PENDING'
        RETURNING {EVENT_COLUMNS}
        "#,
    ))
    .bind(decision)
    .bind(reviewer_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_events(
    pool: &PgPool,
    status: Option<ContentStatus>,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM events
        WHERE ($1::content_status IS NULL OR status = $1)
        ORDER BY date DESC
        "#,
    ))
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Idempotent set-add; reports whether the event exists.
pub async fn add_participant(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(event_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO event_participants (event_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (event_id, user_id) DO NOTHING
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(true)
}

/// Idempotent set-remove; reports whether the event exists.
pub async fn remove_participant(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(event_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(false);
    }

    sqlx::query(
        r#"
        DELETE FROM event_participants
        WHERE event_id = $1 AND user_id = $2
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(true)
}

pub async fn participants(pool: &PgPool, event_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT user_id
        FROM event_participants
        WHERE event_id = $1
        ORDER BY joined_at ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn events_with_participant(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT e.id, e.author_id, e.title, e.description, e.event_image, e.date,
               e.duration_minutes, e.venue, e.event_type, e.tags, e.winner, e.status,
               e.reviewed_by, e.created_at
        FROM events e
        JOIN event_participants ep ON ep.event_id = e.id
        WHERE ep.user_id = $1
        ORDER BY e.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
