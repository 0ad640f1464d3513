use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{CodePurpose, VerificationCode};

pub async fn issue<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    purpose: CodePurpose,
    code: i32,
    expires_at: DateTime<Utc>,
) -> Result<VerificationCode, sqlx::Error> {
    sqlx::query_as::<_, VerificationCode>(
        "INSERT INTO verification_codes (user_id, purpose, code, expires_at)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(purpose)
    .bind(code)
    .bind(expires_at)
    .fetch_one(executor)
    .await
}

pub async fn find_valid<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    purpose: CodePurpose,
    code: i32,
) -> Result<Option<VerificationCode>, sqlx::Error> {
    sqlx::query_as::<_, VerificationCode>(
        "SELECT * FROM verification_codes
         WHERE user_id = $1 AND purpose = $2 AND code = $3
           AND used = false AND expires_at > now()",
    )
    .bind(user_id)
    .bind(purpose)
    .bind(code)
    .fetch_optional(executor)
    .await
}

pub async fn mark_used<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE verification_codes SET used = true WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Issuing a fresh code voids any outstanding ones of the same purpose.
pub async fn void_unused<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    purpose: CodePurpose,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE verification_codes SET used = true
         WHERE user_id = $1 AND purpose = $2 AND used = false",
    )
    .bind(user_id)
    .bind(purpose)
    .execute(executor)
    .await?;
    Ok(())
}
