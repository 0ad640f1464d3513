use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Project;

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    description: &str,
    owner_id: Uuid,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (name, description, owner_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Lookup used by task assignment: the project row only matches when the
/// given user currently occupies its invite slot.
pub async fn find_by_id_and_invited<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    invited_user_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE id = $1 AND invited_user_id = $2",
    )
    .bind(id)
    .bind(invited_user_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_invited(pool: &PgPool, user_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE invited_user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn count_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Only supplied fields replace stored values.
pub async fn update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET name = COALESCE($2, name),
                             description = COALESCE($3, description),
                             updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await
}

pub async fn set_pending_invite<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    email: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET pending_invite_email = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(email)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn fill_invite_slot<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    user_id: Uuid,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET invited_user_id = $2, pending_invite_email = NULL,
                             updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
