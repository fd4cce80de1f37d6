use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::UserId;

/// User model - account records
///
/// The password hash never leaves the database layer: it is excluded from
/// serialization and the API exposes users through `PublicUser`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user fields safe to expose over the API
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

impl User {
    /// Create a user, enforcing username uniqueness at the storage layer.
    ///
    /// Returns `None` when the username is already taken; the unique index
    /// is the only check, so two concurrent signups cannot both succeed.
    pub async fn create(
        username: &str,
        email: Option<&str>,
        password_hash: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Find user by ID, returning None if not found
    pub async fn find_by_id_optional(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Find user by username (login lookup)
    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Count all users
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
