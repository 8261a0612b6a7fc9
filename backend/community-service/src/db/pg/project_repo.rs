use crate::models::{ContentStatus, NewProject, Project, ProjectPatch};
use sqlx::PgPool;
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, author_id, title, description, source_code_link, \
     deployed_link, tech_stack, tags, status, reviewed_by, published_at";

pub async fn insert_project(pool: &PgPool, new: NewProject) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(&format!(
        r#"
        INSERT INTO projects (author_id, title, description, source_code_link, deployed_link, tech_stack, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PROJECT_COLUMNS}
        "#,
    ))
    .bind(new.author_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.source_code_link)
    .bind(new.deployed_link)
    .bind(new.tech_stack)
    .bind(new.tags)
    .fetch_one(pool)
    .await?;

    Ok(project)
}

pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"
        SELECT {PROJECT_COLUMNS}
        FROM projects
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_project(
    pool: &PgPool,
    id: Uuid,
    patch: ProjectPatch,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"
        UPDATE projects
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            source_code_link = COALESCE($3, source_code_link),
            deployed_link = COALESCE($4, deployed_link),
            tech_stack = COALESCE($5, tech_stack),
            tags = COALESCE($6, tags)
        WHERE id = $7
        RETURNING {PROJECT_COLUMNS}
        "#,
    ))
    .bind(patch.title)
    .bind(patch.description)
    .bind(patch.source_code_link)
    .bind(patch.deployed_link)
    .bind(patch.tech_stack)
    .bind(patch.tags)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Conditional moderation update, PENDING rows only.
pub async fn review_project(
    pool: &PgPool,
    id: Uuid,
    decision: ContentStatus,
    reviewer_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"
        UPDATE projects
        SET status = $1, reviewed_by = $2
        WHERE id = $3 AND status = 'PENDING'
        RETURNING {PROJECT_COLUMNS}
        "#,
    ))
    .bind(decision)
    .bind(reviewer_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_projects(
    pool: &PgPool,
    status: Option<ContentStatus>,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"
        SELECT {PROJECT_COLUMNS}
        FROM projects
        WHERE ($1::content_status IS NULL OR status = $1)
        ORDER BY published_at DESC
        "#,
    ))
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn projects_by_author(
    pool: &PgPool,
    author_id: Uuid,
    status: Option<ContentStatus>,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"
        SELECT {PROJECT_COLUMNS}
        FROM projects
        WHERE author_id = $1 AND ($2::content_status IS NULL OR status = $2)
        ORDER BY published_at DESC
        "#,
    ))
    .bind(author_id)
    .bind(status)
    .fetch_all(pool)
    .await
}
