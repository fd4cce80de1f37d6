use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, ReviewId, UserId};

/// Review - a rating and comment left on a listing
///
/// One review per (listing, author) pair, enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review joined with its author's username, for listing detail pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    pub id: ReviewId,
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_username: String,
}

/// Input for creating a new review
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub rating: i32,
    pub comment: String,
}

/// Input for updating a review; `None` fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl Review {
    /// Find review by ID, returning None if not found
    pub async fn find_by_id_optional(id: ReviewId, pool: &PgPool) -> Result<Option<Self>> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(review)
    }

    /// Create a review, enforcing one-per-author at the storage layer.
    ///
    /// Returns `None` when this author already reviewed the listing. The
    /// unique index is the only check, so two concurrent submissions from
    /// the same author cannot both succeed.
    pub async fn create_unique(input: CreateReview, pool: &PgPool) -> Result<Option<Self>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, listing_id, author_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_id, author_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(ReviewId::new())
        .bind(input.listing_id)
        .bind(input.author_id)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_optional(pool)
        .await?;
        Ok(review)
    }

    /// Update a review; omitted fields keep their stored values
    pub async fn update(id: ReviewId, input: UpdateReview, pool: &PgPool) -> Result<Self> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET
                rating = COALESCE($2, rating),
                comment = COALESCE($3, comment),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_one(pool)
        .await?;
        Ok(review)
    }

    /// Delete a review by ID
    pub async fn delete(id: ReviewId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// All reviews for a listing with author usernames, newest first
    pub async fn find_for_listing_with_authors(
        listing_id: ListingId,
        pool: &PgPool,
    ) -> Result<Vec<ReviewWithAuthor>> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.*, u.username AS author_username
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.listing_id = $1
            ORDER BY r.id DESC
            "#,
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// Review comments for a listing, oldest first (for summarization)
    pub async fn comments_for_listing(listing_id: ListingId, pool: &PgPool) -> Result<Vec<String>> {
        let comments = sqlx::query_scalar::<_, String>(
            "SELECT comment FROM reviews WHERE listing_id = $1 ORDER BY id ASC",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;
        Ok(comments)
    }

    /// Count reviews on a listing
    pub async fn count_for_listing(listing_id: ListingId, pool: &PgPool) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE listing_id = $1")
                .bind(listing_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
