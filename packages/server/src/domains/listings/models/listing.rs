use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, UserId};

/// Listing category enum for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trending,
    Rooms,
    IconicCities,
    Mountains,
    AmazingPools,
    Camping,
    Farms,
    Arctic,
    Domes,
    Boats,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Trending,
        Category::Rooms,
        Category::IconicCities,
        Category::Mountains,
        Category::AmazingPools,
        Category::Camping,
        Category::Farms,
        Category::Arctic,
        Category::Domes,
        Category::Boats,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Trending => write!(f, "trending"),
            Category::Rooms => write!(f, "rooms"),
            Category::IconicCities => write!(f, "iconic_cities"),
            Category::Mountains => write!(f, "mountains"),
            Category::AmazingPools => write!(f, "amazing_pools"),
            Category::Camping => write!(f, "camping"),
            Category::Farms => write!(f, "farms"),
            Category::Arctic => write!(f, "arctic"),
            Category::Domes => write!(f, "domes"),
            Category::Boats => write!(f, "boats"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trending" => Ok(Category::Trending),
            "rooms" => Ok(Category::Rooms),
            "iconic_cities" => Ok(Category::IconicCities),
            "mountains" => Ok(Category::Mountains),
            "amazing_pools" => Ok(Category::AmazingPools),
            "camping" => Ok(Category::Camping),
            "farms" => Ok(Category::Farms),
            "arctic" => Ok(Category::Arctic),
            "domes" => Ok(Category::Domes),
            "boats" => Ok(Category::Boats),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}

/// Sort order for listing queries.
///
/// Unknown sort keys fall back to newest-first rather than erroring, so a
/// stale client never breaks browsing. Every clause tie-breaks on `id DESC`
/// to keep page boundaries stable (v7 ids are time-ordered).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl ListingSort {
    pub fn parse(s: &str) -> Self {
        match s {
            "price_asc" => ListingSort::PriceAsc,
            "price_desc" => ListingSort::PriceDesc,
            "rating_desc" => ListingSort::RatingDesc,
            _ => ListingSort::Newest,
        }
    }

    fn order_clause(&self) -> &'static str {
        match self {
            ListingSort::Newest => "id DESC",
            ListingSort::PriceAsc => "price ASC, id DESC",
            ListingSort::PriceDesc => "price DESC, id DESC",
            ListingSort::RatingDesc => "avg_rating DESC, id DESC",
        }
    }
}

/// Listing - a place to stay in the catalog
///
/// `avg_rating` and `review_count` are derived from the review set and
/// written only by the rating aggregator, never through `update`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,

    // Content
    pub title: String,
    pub description: Option<String>,
    pub price: f64,

    // Location
    pub location: String,
    pub country: String,
    pub category: String,

    // Image
    pub image_url: Option<String>,
    pub image_key: Option<String>,

    // Geographic point, (0, 0) when the address never resolved
    pub longitude: f64,
    pub latitude: f64,

    // Ownership
    pub owner_id: UserId,

    // Derived rating state
    pub avg_rating: f64,
    pub review_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new listing
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: String,
    pub country: String,
    pub category: Category,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub owner_id: UserId,
}

/// Input for updating a listing; `None` fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub category: Option<Category>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Filters for browsing the catalog
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort: ListingSort,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Listing {
    /// Find listing by ID, returning None if not found
    pub async fn find_by_id_optional(id: ListingId, pool: &PgPool) -> Result<Option<Self>> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(listing)
    }

    /// Find all listings owned by a user, newest first
    pub async fn find_by_owner(owner_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let listings = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE owner_id = $1 ORDER BY id DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }

    /// Find one page of listings matching the filters.
    ///
    /// The category and search filters use the `$n IS NULL OR ...` pattern so
    /// a single prepared statement covers every combination. Search is a
    /// case-insensitive substring match OR-combined across title, location,
    /// country and description.
    pub async fn find_page(
        filters: &ListingFilters,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let query = format!(
            r#"
            SELECT * FROM listings
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR location ILIKE '%' || $2 || '%'
                   OR country ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            filters.sort.order_clause()
        );

        let listings = sqlx::query_as::<_, Listing>(&query)
            .bind(filters.category.map(|c| c.to_string()))
            .bind(filters.search.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    /// Count listings matching the filters (for pagination metadata)
    pub async fn count_with_filters(filters: &ListingFilters, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM listings
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR location ILIKE '%' || $2 || '%'
                   OR country ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(filters.category.map(|c| c.to_string()))
        .bind(filters.search.as_deref())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count all listings
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Create a new listing (returns inserted record with defaults applied)
    pub async fn create(input: CreateListing, pool: &PgPool) -> Result<Self> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (
                id, title, description, price, location, country, category,
                image_url, image_key, longitude, latitude, owner_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(ListingId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.location)
        .bind(&input.country)
        .bind(input.category.to_string())
        .bind(&input.image_url)
        .bind(&input.image_key)
        .bind(input.longitude)
        .bind(input.latitude)
        .bind(input.owner_id)
        .fetch_one(pool)
        .await?;
        Ok(listing)
    }

    /// Update a listing; omitted fields keep their stored values
    pub async fn update(id: ListingId, input: UpdateListing, pool: &PgPool) -> Result<Self> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            UPDATE listings SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                location = COALESCE($5, location),
                country = COALESCE($6, country),
                category = COALESCE($7, category),
                image_url = COALESCE($8, image_url),
                image_key = COALESCE($9, image_key),
                longitude = COALESCE($10, longitude),
                latitude = COALESCE($11, latitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.location)
        .bind(&input.country)
        .bind(input.category.map(|c| c.to_string()))
        .bind(&input.image_url)
        .bind(&input.image_key)
        .bind(input.longitude)
        .bind(input.latitude)
        .fetch_one(pool)
        .await?;
        Ok(listing)
    }

    /// Delete a listing by ID; reviews and favorites cascade
    pub async fn delete(id: ListingId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
