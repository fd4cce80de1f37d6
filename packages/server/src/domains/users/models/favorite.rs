use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{ListingId, UserId};
use crate::domains::listings::models::Listing;

/// Favorite model - a user's saved listing
///
/// Rows are keyed by (user_id, listing_id); both ends cascade on delete so
/// the set never holds references to vanished users or listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Add a listing to a user's favorites.
    ///
    /// Returns `false` when the pair was already present; the call is
    /// idempotent either way.
    pub async fn add(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, listing_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, listing_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a listing from a user's favorites.
    ///
    /// Returns `false` when there was nothing to remove.
    pub async fn remove(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user has favorited the listing
    pub async fn exists(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM favorites WHERE user_id = $1 AND listing_id = $2",
        )
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// The user's favorited listings, most recently saved first
    pub async fn listings_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT l.*
            FROM favorites f
            JOIN listings l ON l.id = f.listing_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }
}
