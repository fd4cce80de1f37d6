//! Integration tests for review submission and the cached rating it feeds.
//!
//! Reviews hang off listings, one per author, and every mutation must leave
//! the listing's avgRating/reviewCount in sync with the stored reviews.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestHarness};
use serde_json::json;
use server_core::common::{ListingId, ReviewId};
use server_core::domains::listings::models::Category;
use server_core::domains::reviews::models::Review;
use test_context::test_context;

// ============================================================================
// Creating Reviews
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn create_review_updates_the_listing_aggregate(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "agg_owner").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Well Reviewed",
        100.0,
        Category::Trending,
    )
    .await
    .unwrap();

    for (prefix, rating) in [("agg_g1", 5), ("agg_g2", 4), ("agg_g3", 3)] {
        let guest = fixtures::create_test_user(&ctx.db_pool, prefix).await.unwrap();
        let res = ctx
            .api()
            .with_token(fixtures::token_for(&guest))
            .post(
                &format!("/listings/{}/reviews", listing.id),
                json!({ "rating": rating, "comment": "A fine stay" }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.get("data.rating"), json!(rating));
        assert_eq!(res.get("data.listingId"), json!(listing.id));
    }

    let res = ctx.api().get(&format!("/listings/{}", listing.id)).await;
    assert_eq!(res.get("data.reviewCount"), json!(3));
    assert_eq!(res.get("data.avgRating"), json!(4.0));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_review_requires_auth(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "anon_owner").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "No Anonymous Feedback",
        100.0,
        Category::Rooms,
    )
    .await
    .unwrap();

    let res = ctx
        .api()
        .post(
            &format!("/listings/{}/reviews", listing.id),
            json!({ "rating": 5, "comment": "Drive-by praise" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Not authenticated");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_review_validates_input(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "val_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "val_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Strictly Moderated",
        100.0,
        Category::Rooms,
    )
    .await
    .unwrap();

    let api = ctx.api().with_token(fixtures::token_for(&guest));
    let path = format!("/listings/{}/reviews", listing.id);

    let res = api.post(&path, json!({ "comment": "Forgot the stars" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "rating is required");

    let res = api.post(&path, json!({ "rating": 0, "comment": "Too low" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "rating must be between 1 and 5");

    let res = api.post(&path, json!({ "rating": 6, "comment": "Too high" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "rating must be between 1 and 5");

    let res = api.post(&path, json!({ "rating": 4, "comment": "   " })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "comment is required");

    let res = api
        .post(&path, json!({ "rating": 4, "comment": "x".repeat(2001) }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "comment must be at most 2000 characters");

    // Nothing slipped through
    assert_eq!(
        Review::count_for_listing(listing.id, &ctx.db_pool).await.unwrap(),
        0
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_review_on_unknown_listing_is_not_found(ctx: &TestHarness) {
    let guest = fixtures::create_test_user(&ctx.db_pool, "lost_guest").await.unwrap();
    let api = ctx.api().with_token(fixtures::token_for(&guest));
    let body = json!({ "rating": 5, "comment": "Imaginary stay" });

    let res = api
        .post(&format!("/listings/{}/reviews", ListingId::new()), body.clone())
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Listing not found");

    let res = api.post("/listings/not-a-uuid/reviews", body).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Listing not found");
}

// ============================================================================
// One Review Per Author
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn second_review_by_the_same_author_is_rejected(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "dup_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "dup_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Once Is Enough",
        100.0,
        Category::Farms,
    )
    .await
    .unwrap();

    let api = ctx.api().with_token(fixtures::token_for(&guest));
    let path = format!("/listings/{}/reviews", listing.id);

    let first = api.post(&path, json!({ "rating": 5, "comment": "Loved it" })).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = api
        .post(&path, json!({ "rating": 1, "comment": "Changed my mind" }))
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.message(), "You already reviewed this listing");

    // The first review stands, untouched by the rejected one
    assert_eq!(
        Review::count_for_listing(listing.id, &ctx.db_pool).await.unwrap(),
        1
    );
    let res = ctx.api().get(&format!("/listings/{}", listing.id)).await;
    assert_eq!(res.get("data.avgRating"), json!(5.0));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_duplicate_reviews_admit_exactly_one(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "race_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "race_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Race Condition Ranch",
        100.0,
        Category::Farms,
    )
    .await
    .unwrap();

    let api = ctx.api().with_token(fixtures::token_for(&guest));
    let path = format!("/listings/{}/reviews", listing.id);

    // The unique index is the arbiter, not request ordering
    let (a, b) = tokio::join!(
        api.post(&path, json!({ "rating": 5, "comment": "First click" })),
        api.post(&path, json!({ "rating": 5, "comment": "Double click" })),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(
        Review::count_for_listing(listing.id, &ctx.db_pool).await.unwrap(),
        1
    );
}

// ============================================================================
// Updating Reviews
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn author_updates_review_and_aggregate_follows(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "edit_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "edit_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Second Thoughts",
        100.0,
        Category::Boats,
    )
    .await
    .unwrap();
    let review = fixtures::create_test_review(&ctx.db_pool, listing.id, guest.id, 5, "Perfect")
        .await
        .unwrap();

    let api = ctx.api().with_token(fixtures::token_for(&guest));

    let res = api
        .put(
            &format!("/listings/{}/reviews/{}", listing.id, review.id),
            json!({ "rating": 1 }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.get("data.rating"), json!(1));
    // Partial update keeps the old comment
    assert_eq!(res.get("data.comment"), json!("Perfect"));

    let detail = ctx.api().get(&format!("/listings/{}", listing.id)).await;
    assert_eq!(detail.get("data.avgRating"), json!(1.0));

    let res = api
        .put(
            &format!("/listings/{}/reviews/{}", listing.id, review.id),
            json!({ "comment": "On reflection, the leak was a problem" }),
        )
        .await;
    assert_eq!(res.get("data.rating"), json!(1));
    assert_eq!(
        res.get("data.comment"),
        json!("On reflection, the leak was a problem")
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_review_is_author_only(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "auth_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "auth_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Not Yours To Edit",
        100.0,
        Category::Rooms,
    )
    .await
    .unwrap();
    let review = fixtures::create_test_review(&ctx.db_pool, listing.id, guest.id, 4, "Nice")
        .await
        .unwrap();

    // Owning the listing does not grant authorship of its reviews
    let res = ctx
        .api()
        .with_token(fixtures::token_for(&owner))
        .put(
            &format!("/listings/{}/reviews/{}", listing.id, review.id),
            json!({ "rating": 5 }),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.message(), "Forbidden: not the review author");

    let res = ctx
        .api()
        .with_token(fixtures::token_for(&guest))
        .put(
            &format!("/listings/{}/reviews/{}", listing.id, ReviewId::new()),
            json!({ "rating": 5 }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Review not found");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn review_must_belong_to_the_listing_in_the_path(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "mix_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "mix_guest").await.unwrap();
    let reviewed = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "The Reviewed One",
        100.0,
        Category::Rooms,
    )
    .await
    .unwrap();
    let other = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "The Other One",
        100.0,
        Category::Rooms,
    )
    .await
    .unwrap();
    let review = fixtures::create_test_review(&ctx.db_pool, reviewed.id, guest.id, 4, "Good")
        .await
        .unwrap();

    let api = ctx.api().with_token(fixtures::token_for(&guest));

    let res = api
        .put(
            &format!("/listings/{}/reviews/{}", other.id, review.id),
            json!({ "rating": 5 }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Review does not belong to this listing");

    let res = api
        .delete(&format!("/listings/{}/reviews/{}", other.id, review.id))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Review does not belong to this listing");
}

// ============================================================================
// Deleting Reviews
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn author_deletes_review_and_aggregate_follows(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "del_owner2").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Shrinking Consensus",
        100.0,
        Category::AmazingPools,
    )
    .await
    .unwrap();

    let mut reviews = Vec::new();
    for (prefix, rating) in [("del_g1", 5), ("del_g2", 4), ("del_g3", 3)] {
        let guest = fixtures::create_test_user(&ctx.db_pool, prefix).await.unwrap();
        let review =
            fixtures::create_test_review(&ctx.db_pool, listing.id, guest.id, rating, "Stayed")
                .await
                .unwrap();
        reviews.push((guest, review));
    }

    // Drop the 3-star review, the mean moves to 4.5
    let (guest, review) = &reviews[2];
    let res = ctx
        .api()
        .with_token(fixtures::token_for(guest))
        .delete(&format!("/listings/{}/reviews/{}", listing.id, review.id))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Review deleted");

    let detail = ctx.api().get(&format!("/listings/{}", listing.id)).await;
    assert_eq!(detail.get("data.reviewCount"), json!(2));
    assert_eq!(detail.get("data.avgRating"), json!(4.5));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_review_is_author_only(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "keep_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "keep_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Protected Opinions",
        100.0,
        Category::Camping,
    )
    .await
    .unwrap();
    let review = fixtures::create_test_review(&ctx.db_pool, listing.id, guest.id, 2, "Muddy")
        .await
        .unwrap();

    let res = ctx
        .api()
        .with_token(fixtures::token_for(&owner))
        .delete(&format!("/listings/{}/reviews/{}", listing.id, review.id))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.message(), "Forbidden: not the review author");

    assert_eq!(
        Review::count_for_listing(listing.id, &ctx.db_pool).await.unwrap(),
        1
    );
}

// ============================================================================
// Cascade
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_a_listing_removes_its_reviews(ctx: &TestHarness) {
    let owner = fixtures::create_test_user(&ctx.db_pool, "casc_owner").await.unwrap();
    let guest = fixtures::create_test_user(&ctx.db_pool, "casc_guest").await.unwrap();
    let listing = fixtures::create_test_listing(
        &ctx.db_pool,
        owner.id,
        "Taking It All Down",
        100.0,
        Category::IconicCities,
    )
    .await
    .unwrap();
    let review = fixtures::create_test_review(&ctx.db_pool, listing.id, guest.id, 4, "Was fine")
        .await
        .unwrap();

    let res = ctx
        .api()
        .with_token(fixtures::token_for(&owner))
        .delete(&format!("/listings/{}", listing.id))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert_eq!(
        Review::count_for_listing(listing.id, &ctx.db_pool).await.unwrap(),
        0
    );
    assert!(Review::find_by_id_optional(review.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}
