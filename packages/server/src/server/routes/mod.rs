// HTTP routes
pub mod ai;
pub mod auth;
pub mod health;
pub mod listings;
pub mod reviews;
pub mod users;

pub use health::*;

use serde::Serialize;

/// Standard `{"data": ...}` envelope for resource responses
#[derive(Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Standard `{"message": ...}` envelope for status responses
#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
