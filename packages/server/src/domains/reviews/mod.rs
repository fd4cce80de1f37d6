//! Reviews domain - listing reviews and rating aggregation

pub mod models;
pub mod rating;

// Re-export commonly used types
pub use models::{CreateReview, Review, ReviewWithAuthor, UpdateReview};
