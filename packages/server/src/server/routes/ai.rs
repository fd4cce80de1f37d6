//! AI assist routes: listing description drafting and review summarization.
//!
//! These features have no fallback; an unconfigured or failing AI service
//! surfaces as 502.

use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::utils::openai::OpenAiClient;
use crate::common::ListingId;
use crate::domains::reviews::models::Review;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

#[derive(Serialize)]
pub struct DescriptionResponse {
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeReviewsRequest {
    pub listing_id: Option<String>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn ai_client(state: &AppState) -> Result<&Arc<OpenAiClient>, ApiError> {
    state
        .openai
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("AI service is not configured".to_string()))
}

/// POST /ai/generate-description
pub async fn generate_description(
    Extension(state): Extension<AppState>,
    CurrentUser(_auth): CurrentUser,
    Json(body): Json<GenerateDescriptionRequest>,
) -> Result<Json<DescriptionResponse>, ApiError> {
    let title = body.title.as_deref().map(str::trim).unwrap_or_default();
    let location = body.location.as_deref().map(str::trim).unwrap_or_default();
    let country = body.country.as_deref().map(str::trim).unwrap_or_default();

    if title.is_empty() || location.is_empty() || country.is_empty() {
        return Err(ApiError::Validation(
            "Missing required listing details".to_string(),
        ));
    }

    let client = ai_client(&state)?;

    let description = client
        .generate_listing_description(title, location, country, body.category.as_deref(), body.price)
        .await
        .map_err(|_| ApiError::Upstream("AI failed to generate description".to_string()))?;

    Ok(Json(DescriptionResponse { description }))
}

/// POST /ai/summarize-reviews
pub async fn summarize_reviews(
    Extension(state): Extension<AppState>,
    CurrentUser(_auth): CurrentUser,
    Json(body): Json<SummarizeReviewsRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let raw_id = body
        .listing_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Listing ID is required".to_string()))?;

    // Unknown and unparseable ids read as "nothing to summarize"
    let comments = match ListingId::parse(raw_id) {
        Ok(listing_id) => Review::comments_for_listing(listing_id, &state.db_pool).await?,
        Err(_) => Vec::new(),
    };

    if comments.is_empty() {
        return Err(ApiError::Validation(
            "No reviews available to summarize".to_string(),
        ));
    }

    let client = ai_client(&state)?;

    let summary = client
        .summarize_reviews(&comments)
        .await
        .map_err(|_| ApiError::Upstream("AI failed to summarize reviews".to_string()))?;

    Ok(Json(SummaryResponse { summary }))
}
