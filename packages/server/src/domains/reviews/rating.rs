//! Rating aggregation - keeps each listing's cached rating columns in sync
//! with its review set.

use anyhow::Result;
use sqlx::PgPool;

use crate::common::ListingId;

/// Recompute a listing's `avg_rating` and `review_count` from its reviews.
///
/// Runs as a single UPDATE so the two derived columns cannot disagree, and
/// so concurrent callers each land on a state that matches some real review
/// set. The average rounds to two decimals; an empty review set resets both
/// columns to zero. If the listing vanished in the meantime this is a no-op.
pub async fn recalculate(listing_id: ListingId, pool: &PgPool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE listings SET
            review_count = (
                SELECT COUNT(*)::int FROM reviews WHERE listing_id = $1
            ),
            avg_rating = COALESCE(
                (SELECT ROUND(AVG(rating)::numeric, 2)::float8
                 FROM reviews WHERE listing_id = $1),
                0
            ),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(listing_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(listing_id = %listing_id, "skipping rating recalculation, listing is gone");
    }

    Ok(())
}
