use crate::models::{Blog, BlogPatch, ContentStatus, NewBlog};
use sqlx::PgPool;
use uuid::Uuid;

const BLOG_COLUMNS: &str = "id, author_id, title, content, tags, status, reviewed_by, published_at";

pub async fn insert_blog(pool: &PgPool, new: NewBlog) -> Result<Blog, sqlx::Error> {
    let blog = sqlx::query_as::<_, Blog>(&format!(
        r#"
        INSERT INTO blogs (author_id, title, content, tags)
        VALUES ($1, $2, $3, $4)
        RETURNING {BLOG_COLUMNS}
        "#,
    ))
    .bind(new.author_id)
    .bind(new.title)
    .bind(new.content)
    .bind(new.tags)
    .fetch_one(pool)
    .await?;

    Ok(blog)
}

pub async fn get_blog(pool: &PgPool, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(&format!(
        r#"
        SELECT {BLOG_COLUMNS}
        FROM blogs
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_blog(
    pool: &PgPool,
    id: Uuid,
    patch: BlogPatch,
) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(&format!(
        r#"
        UPDATE blogs
        SET title = COALESCE($1, title),
            content = COALESCE($2, content),
            tags = COALESCE($3, tags)
        WHERE id = $4
        RETURNING {BLOG_COLUMNS}
        "#,
    ))
    .bind(patch.title)
    .bind(patch.content)
    .bind(patch.tags)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Conditional moderation update: decides the blog only while it is PENDING.
pub async fn review_blog(
    pool: &PgPool,
    id: Uuid,
    decision: ContentStatus,
    reviewer_id: Uuid,
) -> Result<Option<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(&format!(
        r#"
        UPDATE blogs
        SET status = $1, reviewed_by = $2
        WHERE id = $3 AND status = 'PENDING'
        RETURNING {BLOG_COLUMNS}
        "#,
    ))
    .bind(decision)
    .bind(reviewer_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_blogs(
    pool: &PgPool,
    status: Option<ContentStatus>,
) -> Result<Vec<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(&format!(
        r#"
        SELECT {BLOG_COLUMNS}
        FROM blogs
        WHERE ($1::content_status IS NULL OR status = $1)
        ORDER BY published_at DESC
        "#,
    ))
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn blogs_by_author(
    pool: &PgPool,
    author_id: Uuid,
    status: Option<ContentStatus>,
) -> Result<Vec<Blog>, sqlx::Error> {
    sqlx::query_as::<_, Blog>(&format!(
        r#"
        SELECT {BLOG_COLUMNS}
        FROM blogs
        WHERE author_id = $1 AND ($2::content_status IS NULL OR status = $2)
        ORDER BY published_at DESC
        "#,
    ))
    .bind(author_id)
    .bind(status)
    .fetch_all(pool)
    .await
}
