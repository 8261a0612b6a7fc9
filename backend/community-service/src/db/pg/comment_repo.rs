use crate::models::{Comment, ContentRef, ContentStatus, NewComment};
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, author_id, content, target_kind, target_id, status, reviewed_by, created_at";

pub async fn insert_comment(pool: &PgPool, new: NewComment) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        r#"
        INSERT INTO comments (author_id, content, target_kind, target_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {COMMENT_COLUMNS}
        "#,
    ))
    .bind(new.author_id)
    .bind(new.content)
    .bind(new.target.kind)
    .bind(new.target.id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Deletes the comment together with its likes.
pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM likes
        WHERE target_kind = 'COMMENT' AND target_id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Conditional moderation update, PENDING rows only.
pub async fn review_comment(
    pool: &PgPool,
    id: Uuid,
    decision: ContentStatus,
    reviewer_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        UPDATE comments
        SET status = $1, reviewed_by = $2
        WHERE id = $3 AND status = 'PENDING'
        RETURNING {COMMENT_COLUMNS}
        "#,
    ))
    .bind(decision)
    .bind(reviewer_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn comments_for_target(
    pool: &PgPool,
    target: ContentRef,
    status: Option<ContentStatus>,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE target_kind = $1 AND target_id = $2
          AND ($3::content_status IS NULL OR status = $3)
        ORDER BY created_at DESC
        "#,
    ))
    .bind(target.kind)
    .bind(target.id)
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn list_comments(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        ORDER BY created_at DESC
        "#,
    ))
    .fetch_all(pool)
    .await
}
