// Business domains
pub mod auth;
pub mod listings;
pub mod reviews;
pub mod users;
