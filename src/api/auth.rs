use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::cookie::{clear_session_cookie, extract_session_token, session_cookie};
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::{hash_password, verify_password};
use crate::db::{SessionRepository, User, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub profile_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user record. The password hash never leaves the store
/// layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub profile_name: String,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            profile_name: user.profile_name,
            created_at: user.created_at,
        }
    }
}

/// Validate and normalize a login name. Stored and looked up lowercased.
fn validate_username(username: &str) -> Result<String, AppError> {
    let trimmed = username.trim();

    if trimmed.len() < 3 || trimmed.len() > 30 {
        return Err(AppError::validation(
            "username",
            "Username must be 3-30 characters",
        ));
    }

    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::validation(
            "username",
            "Username must contain only letters, numbers, and underscores",
        ));
    }

    Ok(trimmed.to_lowercase())
}

fn validate_profile_name(profile_name: &str) -> Result<String, AppError> {
    let trimmed = profile_name.trim();
    let len = trimmed.chars().count();

    if len < 3 || len > 30 {
        return Err(AppError::validation(
            "profile_name",
            "Profile name must be 3-30 characters",
        ));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(AppError::validation(
            "profile_name",
            "Profile name must not contain control characters",
        ));
    }

    Ok(trimmed.to_string())
}

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::validation(
            "password",
            "Password must be 8-128 characters",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::validation(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::validation(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "password",
            "Password must contain at least one digit",
        ));
    }

    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(AppError::validation(
            "password",
            "Password must contain at least one special character",
        ));
    }

    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = validate_username(&req.username)?;
    let profile_name = validate_profile_name(&req.profile_name)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;

    // The UNIQUE constraint decides who wins a name race; a violation comes
    // back as Conflict.
    let user =
        UserRepository::create(&state.db, &username, &profile_name, &password_hash).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<([(HeaderName, String); 1], Json<UserResponse>), AppError> {
    let username = req.username.trim().to_lowercase();

    // Unknown name and wrong password answer identically.
    let user = UserRepository::get_by_username(&state.db, &username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let ttl_secs = state.config.session_ttl_secs();
    let session = SessionRepository::create(&state.db, &user.id, ttl_secs).await?;

    let cookie = session_cookie(&session.token, ttl_secs);

    Ok(([(header::SET_COOKIE, cookie)], Json(user.into())))
}

/// POST /api/auth/logout
///
/// Not behind the auth middleware: the carrier is cleared whether or not a
/// live session was presented.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<([(HeaderName, String); 1], Json<serde_json::Value>), AppError> {
    if let Some(token) = extract_session_token(&headers) {
        SessionRepository::revoke(&state.db, token).await?;
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({ "success": true })),
    ))
}

/// GET /api/auth/me (requires auth via middleware)
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}
