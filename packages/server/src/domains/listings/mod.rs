//! Listings domain - the rental catalog

pub mod models;

// Re-export commonly used types
pub use models::{Category, CreateListing, Listing, ListingFilters, ListingSort, UpdateListing};
