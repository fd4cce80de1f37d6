//! Review routes: create, update, delete. Every mutation re-runs the
//! rating aggregator before responding.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::auth::require_review_author;
use crate::common::{ListingId, ReviewId};
use crate::domains::listings::models::Listing;
use crate::domains::reviews::models::{CreateReview, Review, UpdateReview};
use crate::domains::reviews::rating;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;
use crate::server::routes::{Data, Message};

#[derive(Deserialize)]
pub struct ReviewBody {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

fn parse_listing_id(raw: &str) -> Result<ListingId, ApiError> {
    ListingId::parse(raw).map_err(|_| ApiError::NotFound("Listing not found".to_string()))
}

fn parse_review_id(raw: &str) -> Result<ReviewId, ApiError> {
    ReviewId::parse(raw).map_err(|_| ApiError::NotFound("Review not found".to_string()))
}

fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(rating)
}

fn validate_comment(comment: &str) -> Result<String, ApiError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ApiError::Validation("comment is required".to_string()));
    }
    if comment.chars().count() > 2000 {
        return Err(ApiError::Validation(
            "comment must be at most 2000 characters".to_string(),
        ));
    }
    Ok(comment.to_string())
}

/// POST /listings/:id/reviews
pub async fn create_review(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(listing_id): Path<String>,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<Data<Review>>), ApiError> {
    let listing_id = parse_listing_id(&listing_id)?;

    Listing::find_by_id_optional(listing_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;

    let rating = validate_rating(
        body.rating
            .ok_or_else(|| ApiError::Validation("rating is required".to_string()))?,
    )?;
    let comment = validate_comment(body.comment.as_deref().unwrap_or_default())?;

    // The unique index decides; two concurrent submissions cannot both pass
    let review = Review::create_unique(
        CreateReview {
            listing_id,
            author_id: auth.user_id,
            rating,
            comment,
        },
        &state.db_pool,
    )
    .await?
    .ok_or_else(|| ApiError::Conflict("You already reviewed this listing".to_string()))?;

    rating::recalculate(listing_id, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(Data::new(review))))
}

/// PUT /listings/:id/reviews/:review_id
pub async fn update_review(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path((listing_id, review_id)): Path<(String, String)>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<Data<Review>>, ApiError> {
    let listing_id = parse_listing_id(&listing_id)?;
    let review_id = parse_review_id(&review_id)?;

    require_review_author(listing_id, review_id, auth.user_id, &state.db_pool).await?;

    let input = UpdateReview {
        rating: body.rating.map(validate_rating).transpose()?,
        comment: body
            .comment
            .as_deref()
            .map(validate_comment)
            .transpose()?,
    };

    let review = Review::update(review_id, input, &state.db_pool).await?;

    rating::recalculate(listing_id, &state.db_pool).await?;

    Ok(Json(Data::new(review)))
}

/// DELETE /listings/:id/reviews/:review_id
pub async fn delete_review(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path((listing_id, review_id)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let listing_id = parse_listing_id(&listing_id)?;
    let review_id = parse_review_id(&review_id)?;

    require_review_author(listing_id, review_id, auth.user_id, &state.db_pool).await?;

    Review::delete(review_id, &state.db_pool).await?;

    rating::recalculate(listing_id, &state.db_pool).await?;

    Ok(Json(Message::new("Review deleted")))
}
