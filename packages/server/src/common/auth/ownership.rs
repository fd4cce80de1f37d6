//! Ownership predicates gating listing and review mutations.
//!
//! Each predicate resolves the target resources and returns them on success,
//! so callers never fetch the same row twice. Resource existence is checked
//! before ownership: a missing resource is NotFound, never Forbidden.

use sqlx::PgPool;

use crate::common::{ListingId, ReviewId, UserId};
use crate::domains::listings::models::Listing;
use crate::domains::reviews::models::Review;

use super::AuthError;

/// Require that `principal` owns the listing.
///
/// Resolves the listing (`ListingNotFound` if absent), then compares its
/// owner against the principal (`NotListingOwner` on mismatch). Returns the
/// resolved listing.
pub async fn require_listing_owner(
    listing_id: ListingId,
    principal: UserId,
    pool: &PgPool,
) -> Result<Listing, AuthError> {
    let listing = Listing::find_by_id_optional(listing_id, pool)
        .await?
        .ok_or(AuthError::ListingNotFound)?;

    if listing.owner_id != principal {
        return Err(AuthError::NotListingOwner);
    }

    Ok(listing)
}

/// Require that `principal` authored the review, and that the review belongs
/// to the listing named in the request path.
///
/// Resolves both resources (404s first), then checks the review's listing
/// back-reference against the path listing (`ReviewListingMismatch` guards
/// against cross-listing id confusion), then the author.
pub async fn require_review_author(
    listing_id: ListingId,
    review_id: ReviewId,
    principal: UserId,
    pool: &PgPool,
) -> Result<(Listing, Review), AuthError> {
    let listing = Listing::find_by_id_optional(listing_id, pool)
        .await?
        .ok_or(AuthError::ListingNotFound)?;

    let review = Review::find_by_id_optional(review_id, pool)
        .await?
        .ok_or(AuthError::ReviewNotFound)?;

    if review.listing_id != listing.id {
        return Err(AuthError::ReviewListingMismatch);
    }

    if review.author_id != principal {
        return Err(AuthError::NotReviewAuthor);
    }

    Ok((listing, review))
}
