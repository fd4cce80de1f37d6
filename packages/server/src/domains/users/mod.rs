//! Users domain - accounts and their favorites

pub mod models;

// Re-export commonly used types
pub use models::favorite::Favorite;
pub use models::user::User;
