//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{ListingId, ReviewId, UserId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let user_id: UserId = UserId::new();
//! let listing_id: ListingId = ListingId::new();
//!
//! // This would be a compile error:
//! // let wrong: ListingId = user_id;
//! ```

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (accounts).
pub struct User;

/// Marker type for Listing entities (bookable properties).
pub struct Listing;

/// Marker type for Review entities (rating + comment on a listing).
pub struct Review;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Listing entities.
pub type ListingId = Id<Listing>;

/// Typed ID for Review entities.
pub type ReviewId = Id<Review>;
