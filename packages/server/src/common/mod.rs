// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod pagination;
pub mod utils;

pub use auth::AuthError;
pub use entity_ids::*;
pub use id::Id;
pub use pagination::{Page, PageMeta, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
