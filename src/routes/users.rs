use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn get_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

    if user.id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to access this user".to_string(),
        ));
    }

    Ok(Json(user))
}

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", auth.user_id)))?;

    let user = db::users::update_profile(
        &state.pool,
        auth.user_id,
        req.first_name.as_deref(),
        req.last_name.as_deref(),
    )
    .await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

pub async fn block_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

    let user = db::users::set_blocked(&state.pool, id).await?;

    Ok(Json(json!({
        "message": "User blocked successfully",
        "user": user,
    })))
}

/// How many projects the calling manager owns.
pub async fn project_count(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let count = db::projects::count_by_owner(&state.pool, auth.user_id).await?;
    if count == 0 {
        return Err(AppError::NotFound(format!(
            "No projects found for user with ID {}",
            auth.user_id
        )));
    }

    Ok(Json(json!({
        "message": "Project count retrieved successfully",
        "project_count": count,
    })))
}

/// The calling manager's owned projects with their invite slots — the
/// team the manager runs.
pub async fn managed_projects(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let projects = db::projects::list_by_owner(&state.pool, auth.user_id).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound(format!(
            "No projects found for user with ID {}",
            auth.user_id
        )));
    }

    Ok(Json(json!({
        "message": "Managed projects retrieved successfully",
        "projects": projects,
    })))
}
