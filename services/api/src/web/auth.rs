//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use symptom_core::ports::PortError;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

const SESSION_TTL_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: i64,
    pub username: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and password are required".to_string(),
        ));
    }

    // 1. Hash the password. Plaintext never reaches the store.
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password".to_string(),
            )
        })?
        .to_string();

    // 2. Create the user; the store enforces username uniqueness.
    let user = state
        .store
        .create_user(req.username.trim(), &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            other => {
                error!("Failed to create user: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create user".to_string(),
                )
            }
        })?;

    // 3. Open an auth session and hand back the cookie.
    let cookie = open_auth_session(&state, user.id).await?;

    let response = AuthResponse {
        id: user.id,
        username: user.username,
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /api/auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Look up the user. A missing user and a bad password produce the
    //    same response.
    let user = state
        .store
        .get_user_by_username(req.username.trim())
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication error".to_string(),
            )
        })?
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ))?;

    // 2. Verify the password.
    let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication error".to_string(),
        )
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ));
    }

    // 3. Open an auth session and hand back the cookie.
    let cookie = open_auth_session(&state, user.id).await?;

    let response = AuthResponse {
        id: user.id,
        username: user.username,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /api/auth/logout - Logout and invalidate the session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    let auth_session_id = cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .store
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to logout".to_string(),
            )
        })?;

    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}

/// GET /api/auth/me - The account behind the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .store
        .get_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load user".to_string(),
            )
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "Unknown user".to_string()))?;

    Ok(Json(AuthResponse {
        id: user.id,
        username: user.username,
    }))
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Creates an auth session for the user and returns the Set-Cookie value.
async fn open_auth_session(
    state: &Arc<AppState>,
    user_id: i64,
) -> Result<String, (StatusCode, String)> {
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    state
        .store
        .create_auth_session(&auth_session_id, user_id, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session".to_string(),
            )
        })?;

    Ok(format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        auth_session_id,
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    ))
}
