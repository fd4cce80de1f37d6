//! User routes: the authenticated user's favorites set.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;

use crate::common::ListingId;
use crate::domains::listings::models::Listing;
use crate::domains::users::models::favorite::Favorite;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;
use crate::server::routes::{Data, Message};

fn parse_listing_id(raw: &str) -> Result<ListingId, ApiError> {
    ListingId::parse(raw).map_err(|_| ApiError::NotFound("Listing not found".to_string()))
}

/// GET /users/me/favorites
pub async fn get_favorites(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Data<Vec<Listing>>>, ApiError> {
    let listings = Favorite::listings_for_user(auth.user_id, &state.db_pool).await?;
    Ok(Json(Data::new(listings)))
}

/// POST /users/me/favorites/:listing_id
pub async fn add_favorite(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(listing_id): Path<String>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let listing_id = parse_listing_id(&listing_id)?;

    Listing::find_by_id_optional(listing_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;

    // Set semantics: re-adding is a no-op success
    Favorite::add(auth.user_id, listing_id, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(Message::new("Added to favorites"))))
}

/// DELETE /users/me/favorites/:listing_id
pub async fn remove_favorite(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(listing_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let listing_id = parse_listing_id(&listing_id)?;

    // Idempotent: removing something never favorited is still a success
    Favorite::remove(auth.user_id, listing_id, &state.db_pool).await?;

    Ok(Json(Message::new("Removed from favorites")))
}
