use thiserror::Error;

/// Authorization errors raised by the ownership guards
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Forbidden: not the owner")]
    NotListingOwner,

    #[error("Forbidden: not the review author")]
    NotReviewAuthor,

    #[error("Review does not belong to this listing")]
    ReviewListingMismatch,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
