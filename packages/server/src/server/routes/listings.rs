//! Listing routes: browse, detail, create, update, delete.

use std::str::FromStr;

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::require_listing_owner;
use crate::common::pagination::{PageMeta, PageRequest};
use crate::common::utils::geocoding::GeoPoint;
use crate::common::utils::images::StoredImage;
use crate::common::ListingId;
use crate::domains::listings::models::{
    Category, CreateListing, Listing, ListingFilters, ListingSort, UpdateListing,
};
use crate::domains::reviews::models::{Review, ReviewWithAuthor};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;
use crate::server::routes::{Data, Message};

/// Browse query parameters.
///
/// Numbers arrive as strings; unparseable page/limit fall back to defaults
/// instead of erroring, matching how browsers resubmit stale query strings.
#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// One page of listings plus pagination metadata
#[derive(Serialize)]
pub struct ListingPage {
    pub data: Vec<Listing>,
    pub meta: PageMeta,
}

/// A listing with its reviews populated, for the detail endpoint
#[derive(Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub reviews: Vec<ReviewWithAuthor>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
}

fn parse_listing_id(raw: &str) -> Result<ListingId, ApiError> {
    // Unparseable ids behave like missing records
    ListingId::parse(raw).map_err(|_| ApiError::NotFound("Listing not found".to_string()))
}

fn parse_category(raw: &str) -> Result<Category, ApiError> {
    Category::from_str(raw.trim()).map_err(|e| ApiError::Validation(e.to_string()))
}

fn validate_price(price: f64) -> Result<f64, ApiError> {
    if price < 0.0 {
        return Err(ApiError::Validation(
            "price must be non-negative".to_string(),
        ));
    }
    Ok(price)
}

/// GET /listings
pub async fn list_listings(
    Extension(state): Extension<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListingPage>, ApiError> {
    let category = q
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(parse_category)
        .transpose()?;

    let filters = ListingFilters {
        category,
        search: q
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        sort: q.sort.as_deref().map(ListingSort::parse).unwrap_or_default(),
    };

    let page = PageRequest {
        page: q.page.as_deref().and_then(|s| s.parse().ok()),
        limit: q.limit.as_deref().and_then(|s| s.parse().ok()),
    }
    .normalize();

    let total_items = Listing::count_with_filters(&filters, &state.db_pool).await?;
    let listings =
        Listing::find_page(&filters, page.limit, page.offset(), &state.db_pool).await?;

    Ok(Json(ListingPage {
        data: listings,
        meta: PageMeta::new(total_items, &page),
    }))
}

/// GET /listings/:id
pub async fn get_listing(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Data<ListingDetail>>, ApiError> {
    let id = parse_listing_id(&id)?;

    let listing = Listing::find_by_id_optional(id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;

    let reviews = Review::find_for_listing_with_authors(id, &state.db_pool).await?;

    Ok(Json(Data::new(ListingDetail { listing, reviews })))
}

/// POST /listings
pub async fn create_listing(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(body): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<Data<Listing>>), ApiError> {
    let title = body.title.as_deref().map(str::trim).unwrap_or_default();
    let location = body.location.as_deref().map(str::trim).unwrap_or_default();
    let country = body.country.as_deref().map(str::trim).unwrap_or_default();

    if title.is_empty() || location.is_empty() || country.is_empty() {
        return Err(ApiError::Validation(
            "title, location and country are required".to_string(),
        ));
    }

    let category = match body.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(raw) => parse_category(raw)?,
        None => return Err(ApiError::Validation("category is required".to_string())),
    };

    let price = validate_price(body.price.unwrap_or(0.0))?;

    let image = StoredImage::from_input(body.image_url, body.image_key)
        .map_err(|msg| ApiError::Validation(msg.to_string()))?;
    let (image_url, image_key) = match image {
        Some(image) => (Some(image.url), image.key),
        None => (None, None),
    };

    // Best effort: failures land on the origin point rather than failing
    // the request
    let point = state
        .geocoder
        .geocode(&format!("{}, {}", location, country))
        .await
        .unwrap_or_else(GeoPoint::origin);

    let listing = Listing::create(
        CreateListing {
            title: title.to_string(),
            description: body.description,
            price,
            location: location.to_string(),
            country: country.to_string(),
            category,
            image_url,
            image_key,
            longitude: point.longitude,
            latitude: point.latitude,
            owner_id: auth.user_id,
        },
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Data::new(listing))))
}

/// PUT /listings/:id
pub async fn update_listing(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<Data<Listing>>, ApiError> {
    let id = parse_listing_id(&id)?;

    let existing = require_listing_owner(id, auth.user_id, &state.db_pool).await?;

    let title = body.title.map(|t| t.trim().to_string());
    let location = body.location.map(|l| l.trim().to_string());
    let country = body.country.map(|c| c.trim().to_string());

    if matches!(&title, Some(t) if t.is_empty())
        || matches!(&location, Some(l) if l.is_empty())
        || matches!(&country, Some(c) if c.is_empty())
    {
        return Err(ApiError::Validation(
            "title, location and country cannot be blank".to_string(),
        ));
    }

    let category = body
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(parse_category)
        .transpose()?;

    let price = body.price.map(validate_price).transpose()?;

    let (image_url, image_key) = match body.image_url {
        Some(url) => {
            let image = StoredImage::from_input(Some(url), body.image_key)
                .map_err(|msg| ApiError::Validation(msg.to_string()))?;
            match image {
                Some(image) => (Some(image.url), image.key),
                None => (None, None),
            }
        }
        None => (None, None),
    };

    // Re-geocode when the address changed, merging the new values with the
    // stored ones; a failed lookup keeps the old point
    let mut longitude = None;
    let mut latitude = None;
    if location.is_some() || country.is_some() {
        let place = format!(
            "{}, {}",
            location.as_deref().unwrap_or(&existing.location),
            country.as_deref().unwrap_or(&existing.country),
        );
        if let Some(point) = state.geocoder.geocode(&place).await {
            longitude = Some(point.longitude);
            latitude = Some(point.latitude);
        }
    }

    let listing = Listing::update(
        id,
        UpdateListing {
            title,
            description: body.description,
            price,
            location,
            country,
            category,
            image_url,
            image_key,
            longitude,
            latitude,
        },
        &state.db_pool,
    )
    .await?;

    Ok(Json(Data::new(listing)))
}

/// DELETE /listings/:id
pub async fn delete_listing(
    Extension(state): Extension<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_listing_id(&id)?;

    require_listing_owner(id, auth.user_id, &state.db_pool).await?;

    // Reviews and favorites cascade at the storage layer
    Listing::delete(id, &state.db_pool).await?;

    Ok(Json(Message::new("Listing deleted")))
}
