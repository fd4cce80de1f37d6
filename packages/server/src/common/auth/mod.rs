//! Resource-ownership authorization.
//!
//! Mutation endpoints are gated by ownership predicates that resolve the
//! target resources and compare their owner/author against the acting
//! principal:
//!
//! ```rust,ignore
//! use crate::common::auth::require_listing_owner;
//!
//! // In a handler, after authentication:
//! let listing = require_listing_owner(listing_id, user.user_id, &pool).await?;
//! ```
//!
//! The predicates are transport-agnostic; the HTTP layer maps `AuthError`
//! variants onto status codes.

mod errors;
mod ownership;

pub use errors::AuthError;
pub use ownership::{require_listing_owner, require_review_author};
