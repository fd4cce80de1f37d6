//! Auth domain - username/password accounts and JWT sessions
//!
//! Responsibilities:
//! - Argon2id password hashing and verification
//! - Stateless JWT token management (7-day expiry)

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use password::{hash_password, verify_password};
