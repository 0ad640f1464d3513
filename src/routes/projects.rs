use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Project, Role};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

fn conflict_on_duplicate_description(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A project with this description already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    if req.name.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let project = db::projects::create(&state.pool, &req.name, &req.description, auth.user_id)
        .await
        .map_err(conflict_on_duplicate_description)?;

    Ok(Json(json!({
        "message": "Project created successfully",
        "project": project,
    })))
}

pub async fn list_owned(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let projects = db::projects::list_by_owner(&state.pool, auth.user_id).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound("No projects found".to_string()));
    }

    Ok(Json(json!({
        "message": "Projects retrieved successfully",
        "projects": projects,
    })))
}

/// Projects whose invite slot holds the caller.
pub async fn list_assigned(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let projects = db::projects::list_by_invited(&state.pool, auth.user_id).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound("No assigned projects found".to_string()));
    }

    Ok(Json(json!({
        "message": "Assigned projects retrieved successfully",
        "projects": projects,
    })))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let project = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to access this project".to_string(),
        ));
    }

    Ok(Json(project))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to update this project".to_string(),
        ));
    }

    // Omitted fields are preserved, matching the task update semantics.
    let project = db::projects::update(&mut *tx, id, req.name.as_deref(), req.description.as_deref())
        .await
        .map_err(conflict_on_duplicate_description)?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Project updated successfully",
        "project": project,
    })))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this project".to_string(),
        ));
    }

    db::projects::delete(&mut *tx, id).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Project deleted successfully",
        "project": project,
    })))
}

/// Records whom the invitation is addressed to and emails an acceptance
/// link. The invite slot itself stays empty until acceptance.
pub async fn invite(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to access this project".to_string(),
        ));
    }

    let invitee = db::users::find_by_email(&mut *tx, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    db::projects::set_pending_invite(&mut *tx, id, &invitee.email).await?;

    let accept_url = format!("{}/projects/{}/accept-invite", state.config.base_url, id);
    match &state.mailer {
        Some(mailer) => {
            mailer
                .send_project_invitation(&invitee.email, &invitee.first_name, &project.name, &accept_url)
                .await
                .map_err(AppError::Internal)?;
        }
        None => {
            tracing::warn!(
                "SMTP not configured. Invitation link for {}: {accept_url}",
                invitee.email
            );
        }
    }

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Invitation sent successfully",
    })))
}

/// Fills the invite slot with the caller. Only the user the outstanding
/// invitation was addressed to may accept; re-acceptance by the current
/// slot holder is a no-op.
pub async fn accept_invite(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = state.pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let pending_matches = project
        .pending_invite_email
        .as_deref()
        .is_some_and(|email| email.eq_ignore_ascii_case(&auth.email));
    let already_member = project.invited_user_id == Some(auth.user_id);

    if !pending_matches && !already_member {
        return Err(AppError::Forbidden(
            "This invitation was not addressed to you".to_string(),
        ));
    }

    let project = if pending_matches {
        db::projects::fill_invite_slot(&mut *tx, id, auth.user_id).await?
    } else {
        project
    };

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Invitation accepted successfully",
        "project": project,
    })))
}
