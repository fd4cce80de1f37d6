use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::{middleware::Next, response::Response};
use tracing::debug;

use crate::common::UserId;
use crate::domains::auth::JwtService;
use crate::server::error::ApiError;

/// The authenticated principal, as recovered from a verified JWT.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Non-blocking authentication middleware.
///
/// Verifies the Authorization header when present and stores an [`AuthUser`]
/// in the request extensions. Requests without a valid token pass through
/// untouched; handlers that need a principal extract [`CurrentUser`].
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &jwt_service) {
        Some(user) => {
            debug!(user_id = %user.user_id, "authenticated request");
            request.extensions_mut().insert(user);
        }
        None => debug!("no valid authentication token"),
    }

    next.run(request).await
}

/// Verify the token carried in `headers`, if any.
///
/// Accepts both `Bearer <token>` and a bare token.
fn authenticate(headers: &HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: UserId::from_uuid(claims.user_id),
        username: claims.username,
    })
}

/// Extractor for handlers that require authentication.
///
/// Reads the AuthUser the middleware placed in request extensions and
/// rejects with 401 when it is absent.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}
