// Roost - listings-and-reviews marketplace API
//
// This crate provides the backend REST API for listings, reviews, favorites,
// and authentication. The core flow is review aggregation (denormalized
// avg_rating/review_count on listings, recomputed after every review
// mutation) combined with ownership checks gating listing and review
// mutation endpoints.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
