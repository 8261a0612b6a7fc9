use crate::error::{AppError, Result};
use crate::models::{Like, ReactionTarget, TargetKind};
use sqlx::PgPool;
use uuid::Uuid;

const LIKE_COLUMNS: &str = "id, author_id, target_kind, target_id, created_at";

/// Create a Like row. The unique index over (author_id, target_kind,
/// target_id) rejects a second like of the same target by the same author.
pub async fn insert_like(
    pool: &PgPool,
    author_id: Uuid,
    target: ReactionTarget,
) -> Result<Like> {
    let result = sqlx::query_as::<_, Like>(&format!(
        r#"
        INSERT INTO likes (author_id, target_kind, target_id)
        VALUES ($1, $2, $3)
        RETURNING {LIKE_COLUMNS}
        "#,
    ))
    .bind(author_id)
    .bind(target.kind)
    .bind(target.id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(like) => Ok(like),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Validation(
            format!("{} already liked", target.kind),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Delete the Like matching (author, target). `false` when absent.
pub async fn delete_like(
    pool: &PgPool,
    author_id: Uuid,
    target: ReactionTarget,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE author_id = $1 AND target_kind = $2 AND target_id = $3
        "#,
    )
    .bind(author_id)
    .bind(target.kind)
    .bind(target.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch every Like pointing at any of `targets` in a single query.
pub async fn likes_for_targets(
    pool: &PgPool,
    targets: &[ReactionTarget],
) -> Result<Vec<Like>> {
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let kinds: Vec<TargetKind> = targets.iter().map(|t| t.kind).collect();
    let ids: Vec<Uuid> = targets.iter().map(|t| t.id).collect();

    let likes = sqlx::query_as::<_, Like>(&format!(
        r#"
        SELECT {LIKE_COLUMNS}
        FROM likes
        WHERE (target_kind, target_id) IN (
            SELECT * FROM UNNEST($1::target_kind[], $2::uuid[])
        )
        "#,
    ))
    .bind(kinds)
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}
