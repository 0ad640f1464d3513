pub mod auth;
pub mod projects;
pub mod tasks;
pub mod users;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/register-manager", post(auth::register_manager))
        .route("/api/v1/auth/verify-email", post(auth::verify_email))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .route("/api/v1/auth/{provider}/login", get(auth::oauth_login))
        .route("/api/v1/auth/{provider}/callback", get(auth::oauth_callback))
        // Users
        .route("/api/v1/users", patch(users::update_profile))
        .route("/api/v1/users/count", get(users::project_count))
        .route("/api/v1/users/managed", get(users::managed_projects))
        .route("/api/v1/users/blocked/{id}", put(users::block_user))
        .route("/api/v1/users/{id}", get(users::get_user))
        // Projects
        .route(
            "/api/v1/projects",
            get(projects::list_owned).post(projects::create),
        )
        .route("/api/v1/projects/assigned", get(projects::list_assigned))
        .route(
            "/api/v1/projects/{project_id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/v1/projects/{project_id}/invite", post(projects::invite))
        .route(
            "/api/v1/projects/{project_id}/accept-invite",
            post(projects::accept_invite),
        )
        // Tasks
        .route(
            "/api/v1/projects/{project_id}/tasks",
            get(tasks::list_all).post(tasks::create),
        )
        .route(
            "/api/v1/projects/{project_id}/tasks/assigned",
            get(tasks::list_assigned),
        )
        .route(
            "/api/v1/projects/{project_id}/tasks/count",
            get(tasks::count_assigned),
        )
        .route(
            "/api/v1/projects/{project_id}/tasks/{task_id}/assign",
            post(tasks::assign),
        )
        .route(
            "/api/v1/tasks/{task_id}",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .route("/api/v1/tasks/{task_id}/status", patch(tasks::change_status))
}
