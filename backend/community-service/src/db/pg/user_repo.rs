use crate::models::UserProfile;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, fullname, username, avatar, email, role";

pub async fn profile_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn profile_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users
        WHERE username = $1
        "#,
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Batch projection lookup; one query for an arbitrary id set.
pub async fn profiles_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, UserProfile>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let profiles = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users
        WHERE id = ANY($1)
        "#,
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(profiles.into_iter().map(|p| (p.id, p)).collect())
}
