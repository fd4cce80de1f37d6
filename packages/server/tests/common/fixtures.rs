//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.
//! The database is shared across tests, so usernames are uniquified and
//! listing titles should carry a test-specific marker when searched for.

use anyhow::Result;
use server_core::common::UserId;
use server_core::domains::auth::{hash_password, JwtService};
use server_core::domains::listings::models::{Category, CreateListing, Listing};
use server_core::domains::reviews::models::{CreateReview, Review};
use server_core::domains::reviews::rating;
use server_core::domains::users::models::user::User;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TEST_JWT_ISSUER, TEST_JWT_SECRET};

/// Password every fixture user is created with
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Create a user with a unique username
pub async fn create_test_user(pool: &PgPool, prefix: &str) -> Result<User> {
    let username = format!("{}_{}", prefix, Uuid::new_v4().simple());
    let password_hash = hash_password(TEST_PASSWORD)?;

    let user = User::create(&username, None, &password_hash, pool)
        .await?
        .expect("generated username should be unique");

    Ok(user)
}

/// Mint a valid token for a user, same key material as the test router
pub fn token_for(user: &User) -> String {
    JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
        .create_token(user.id.into_uuid(), user.username.clone())
        .expect("token creation should succeed")
}

/// Create a listing owned by the given user
pub async fn create_test_listing(
    pool: &PgPool,
    owner_id: UserId,
    title: &str,
    price: f64,
    category: Category,
) -> Result<Listing> {
    Listing::create(
        CreateListing {
            title: title.to_string(),
            description: Some("A quiet place with a view".to_string()),
            price,
            location: "Jaipur".to_string(),
            country: "India".to_string(),
            category,
            image_url: None,
            image_key: None,
            longitude: 75.79,
            latitude: 26.92,
            owner_id,
        },
        pool,
    )
    .await
}

/// Create a review and bring the listing's cached rating up to date,
/// the same sequence the API performs
pub async fn create_test_review(
    pool: &PgPool,
    listing_id: server_core::common::ListingId,
    author_id: UserId,
    rating_value: i32,
    comment: &str,
) -> Result<Review> {
    let review = Review::create_unique(
        CreateReview {
            listing_id,
            author_id,
            rating: rating_value,
            comment: comment.to_string(),
        },
        pool,
    )
    .await?
    .expect("fixture author should not have an existing review");

    rating::recalculate(listing_id, pool).await?;

    Ok(review)
}
