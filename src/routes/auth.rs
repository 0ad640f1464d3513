use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::oauth::{self, Provider};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{CodePurpose, Role, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: i32,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
}

#[derive(Serialize)]
pub struct OAuthResponse {
    pub profile: User,
    pub access_token: String,
}

fn generate_code() -> i32 {
    rand::rng().random_range(100_000..=999_999)
}

/// Codes and invitation links are logged instead of mailed when SMTP is
/// not configured, so the flows stay usable in development.
async fn deliver_verification_code(
    state: &SharedState,
    user: &User,
    code: i32,
) -> Result<(), AppError> {
    match &state.mailer {
        Some(mailer) => mailer
            .send_verification_code(&user.email, &user.first_name, code)
            .await
            .map_err(AppError::Internal),
        None => {
            tracing::warn!("SMTP not configured. Verification code for {}: {code}", user.email);
            Ok(())
        }
    }
}

async fn deliver_reset_code(state: &SharedState, user: &User, code: i32) -> Result<(), AppError> {
    match &state.mailer {
        Some(mailer) => mailer
            .send_password_reset_code(&user.email, code)
            .await
            .map_err(AppError::Internal),
        None => {
            tracing::warn!("SMTP not configured. Reset code for {}: {code}", user.email);
            Ok(())
        }
    }
}

fn issue_token(state: &SharedState, user: &User) -> Result<String, AppError> {
    let claims = Claims::new(
        user.id,
        user.email.clone(),
        user.role,
        state.config.jwt_ttl_minutes,
    );
    encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    register_with_role(
        &state,
        req,
        Role::User,
        "User registered successfully, please check your email for verification",
    )
    .await
}

pub async fn register_manager(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    register_with_role(
        &state,
        req,
        Role::Manager,
        "Manager registered successfully, please check your email for verification",
    )
    .await
}

async fn register_with_role(
    state: &SharedState,
    req: RegisterRequest,
    role: Role,
    message: &str,
) -> Result<Json<MessageResponse>, AppError> {
    if req.first_name.is_empty() || req.last_name.is_empty() || req.email.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let mut tx = state.pool.begin().await?;

    // Duplicate-email guard, with the unique constraint as backstop.
    if db::users::find_by_email(&mut *tx, &req.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = db::users::create(
        &mut *tx,
        &req.first_name,
        &req.last_name,
        &req.email,
        Some(&pw_hash),
        role,
        false,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("User already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let code = generate_code();
    db::verification_codes::issue(
        &mut *tx,
        user.id,
        CodePurpose::EmailVerify,
        code,
        Utc::now() + Duration::hours(1),
    )
    .await?;

    // Mail goes out before commit: a send failure rolls the account back.
    deliver_verification_code(state, &user, code).await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

pub async fn verify_email(
    State(state): State<SharedState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut tx = state.pool.begin().await?;

    let user = db::users::find_by_email(&mut *tx, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid email or verification code".to_string())
        })?;

    let record =
        db::verification_codes::find_valid(&mut *tx, user.id, CodePurpose::EmailVerify, req.code)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid email or verification code".to_string())
            })?;

    db::verification_codes::mark_used(&mut *tx, record.id).await?;
    db::users::mark_verified(&mut *tx, user.id).await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Your email has been verified! You may now log in to your account.".to_string(),
    }))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    // OAuth-only accounts carry no password hash and cannot log in here.
    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify(&req.password, stored_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_verified {
        return Err(AppError::Unauthorized(
            "Please verify your email before logging in.".to_string(),
        ));
    }

    let access_token = issue_token(&state, &user)?;

    Ok(Json(LoginResponse { user, access_token }))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email".to_string()))?;

    let mut tx = state.pool.begin().await?;

    db::verification_codes::void_unused(&mut *tx, user.id, CodePurpose::PasswordReset).await?;

    let code = generate_code();
    db::verification_codes::issue(
        &mut *tx,
        user.id,
        CodePurpose::PasswordReset,
        code,
        Utc::now() + Duration::hours(1),
    )
    .await?;

    deliver_reset_code(&state, &user, code).await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "A verification code has been sent to your email address. Please check your email to proceed with password reset.".to_string(),
    }))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let mut tx = state.pool.begin().await?;

    let user = db::users::find_by_email(&mut *tx, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or code".to_string()))?;

    let record =
        db::verification_codes::find_valid(&mut *tx, user.id, CodePurpose::PasswordReset, req.code)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or code".to_string()))?;

    let pw_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;
    db::users::update_password(&mut *tx, user.id, &pw_hash).await?;
    db::verification_codes::mark_used(&mut *tx, record.id).await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

pub async fn change_password(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Current password is incorrect".to_string()))?;

    let valid = password::verify(&req.current_password, stored_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let pw_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &pw_hash).await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

// ── OAuth ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
}

fn provider_config<'a>(
    state: &'a SharedState,
    provider: Provider,
) -> Result<&'a crate::config::OAuthProviderConfig, AppError> {
    let config = match provider {
        Provider::Google => state.config.google_oauth.as_ref(),
        Provider::GitHub => state.config.github_oauth.as_ref(),
    };
    config.ok_or_else(|| {
        AppError::BadRequest(format!("OAuth provider {} is not configured", provider.name()))
    })
}

pub async fn oauth_login(
    State(state): State<SharedState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let provider = Provider::parse(&provider)
        .ok_or_else(|| AppError::BadRequest("Unknown OAuth provider".to_string()))?;
    let config = provider_config(&state, provider)?;

    let bytes: [u8; 32] = rand::random();
    let oauth_state = hex::encode(bytes);

    let url = oauth::authorize_url(provider, config, &oauth_state);

    let cookie = Cookie::build(("oauth_state", oauth_state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::temporary(&url)))
}

pub async fn oauth_callback(
    State(state): State<SharedState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<OAuthResponse>), AppError> {
    let provider = Provider::parse(&provider)
        .ok_or_else(|| AppError::BadRequest("Unknown OAuth provider".to_string()))?;
    let config = provider_config(&state, provider)?;

    let expected = jar
        .get("oauth_state")
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing OAuth state".to_string()))?;
    if expected != query.state {
        return Err(AppError::Unauthorized("Invalid OAuth state".to_string()));
    }

    let profile = oauth::fetch_profile(provider, config, &query.code)
        .await
        .map_err(AppError::Internal)?;

    // Idempotent on repeated callbacks for the same email.
    let user = match db::users::find_by_email(&state.pool, &profile.email).await? {
        Some(user) => user,
        None => {
            db::users::create(
                &state.pool,
                &profile.first_name,
                &profile.last_name,
                &profile.email,
                None,
                Role::User,
                true,
            )
            .await?
        }
    };

    let access_token = issue_token(&state, &user)?;

    let cleared = jar.remove(Cookie::build(("oauth_state", "")).path("/").build());

    Ok((
        cleared,
        Json(OAuthResponse {
            profile: user,
            access_token,
        }),
    ))
}
