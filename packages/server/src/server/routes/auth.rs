//! Account routes: signup, login, logout and current-user lookup.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domains::auth::{hash_password, verify_password};
use crate::domains::users::models::user::{PublicUser, User};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;
use crate::server::routes::Message;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token plus the public user fields, returned by signup and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// POST /auth/signup
pub async fn signup(
    Extension(state): Extension<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = body.username.as_deref().map(str::trim).unwrap_or_default();
    let password = body.password.as_deref().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let password_hash = hash_password(password)?;

    let user = User::create(username, email, &password_hash, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::Conflict("Username already taken".to_string()))?;

    let token = state
        .jwt_service
        .create_token(user.id.into_uuid(), user.username.clone())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = body.username.as_deref().map(str::trim).unwrap_or_default();
    let password = body.password.as_deref().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let user = User::find_by_username(username, &state.db_pool).await?;

    // Same rejection for unknown user and wrong password
    let user = match user {
        Some(user) if verify_password(password, &user.password_hash)? => user,
        _ => return Err(ApiError::InvalidCredentials),
    };

    let token = state
        .jwt_service
        .create_token(user.id.into_uuid(), user.username.clone())?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/logout
///
/// Tokens are stateless, so logout is just an acknowledgement; the client
/// discards its token.
pub async fn logout() -> Json<Message> {
    Json(Message::new("Logged out"))
}

/// GET /auth/me
pub async fn me(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    // The token may outlive the account
    let user = User::find_by_id_optional(auth.user_id, &state.db_pool)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(MeResponse { user: user.into() }))
}
