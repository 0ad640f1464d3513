use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Project, Role, Task, TaskStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize)]
pub struct AssignTaskRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TaskStatus,
}

/// Loads a task together with its project. The ownership gate on task
/// mutations runs against the project's owner, not the task itself.
async fn find_task_with_project(
    conn: &mut sqlx::PgConnection,
    task_id: Uuid,
) -> Result<(Task, Project), AppError> {
    let task = db::tasks::find_by_id(&mut *conn, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    let project = db::projects::find_by_id(&mut *conn, task.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok((task, project))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    if req.name.is_empty() || req.description.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let mut tx = state.pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to access this project".to_string(),
        ));
    }

    let task = db::tasks::create(&mut *tx, project_id, &req.name, &req.description).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Task created successfully",
        "task": task,
    })))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let (task, project) = find_task_with_project(&mut *tx, task_id).await?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to update this task".to_string(),
        ));
    }

    let task = db::tasks::update(
        &mut *tx,
        task.id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.status,
    )
    .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let (task, project) = find_task_with_project(&mut *tx, task_id).await?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this task".to_string(),
        ));
    }

    db::tasks::delete(&mut *tx, task.id).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Task deleted successfully",
    })))
}

/// Assignment requires the assignee to currently occupy the project's
/// invite slot; the notification mail is part of the operation and a send
/// failure rolls the assignment back.
pub async fn assign(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Manager])?;

    let mut tx = state.pool.begin().await?;

    let (task, task_project) = find_task_with_project(&mut *tx, task_id).await?;

    if task_project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to update this task".to_string(),
        ));
    }

    let assignee = db::users::find_by_email(&mut *tx, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let project = db::projects::find_by_id_and_invited(&mut *tx, project_id, assignee.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Project not found or no invite for this email".to_string())
        })?;

    let task = db::tasks::set_assigned_user(&mut *tx, task.id, assignee.id).await?;

    match &state.mailer {
        Some(mailer) => {
            mailer
                .send_task_assigned(&assignee.email, &assignee.first_name, &task.name, &project.name)
                .await
                .map_err(AppError::Internal)?;
        }
        None => {
            tracing::warn!(
                "SMTP not configured. Assignment notice for {} skipped (task {})",
                assignee.email,
                task.id
            );
        }
    }

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Task assigned successfully and email sent",
        "task": task,
    })))
}

pub async fn list_assigned(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tasks = db::tasks::list_assigned(&state.pool, project_id, auth.user_id).await?;
    if tasks.is_empty() {
        return Err(AppError::NotFound(
            "No tasks assigned to the current user.".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Assigned tasks retrieved successfully",
        "tasks": tasks,
    })))
}

pub async fn list_all(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.user_id {
        return Err(AppError::Forbidden(
            "You are not authorized to access this project".to_string(),
        ));
    }

    let tasks = db::tasks::list_by_project(&state.pool, project_id).await?;

    Ok(Json(json!({
        "message": "All tasks retrieved successfully",
        "tasks": tasks,
    })))
}

pub async fn count_assigned(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = db::tasks::count_assigned(&state.pool, project_id, auth.user_id).await?;
    if count == 0 {
        return Err(AppError::NotFound(
            "No tasks assigned to the current user.".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Task count retrieved successfully",
        "task_count": count,
    })))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let (task, project) = find_task_with_project(&mut conn, task_id).await?;

    let is_owner = project.owner_id == auth.user_id;
    let is_assignee = task.assigned_user_id == Some(auth.user_id);
    if !is_owner && !is_assignee {
        return Err(AppError::Forbidden(
            "You are not authorized to view this task.".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Task retrieved successfully",
        "task": task,
    })))
}

/// Only the assigned user may move a task; the project owner is
/// deliberately excluded from this path. Any status may follow any other.
pub async fn change_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::User])?;

    let mut tx = state.pool.begin().await?;

    let task = db::tasks::find_by_id(&mut *tx, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    if task.assigned_user_id != Some(auth.user_id) {
        return Err(AppError::Forbidden(
            "You are not authorized to change the status of this task".to_string(),
        ));
    }

    let task = db::tasks::set_status(&mut *tx, task.id, req.status).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Task status updated successfully",
        "task": task,
    })))
}
