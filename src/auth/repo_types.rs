use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,                      // assigned by the store, immutable
    pub username: String,             // unique
    pub email: String,                // unique
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,        // Argon2 PHC string, never exposed
    pub full_name: Option<String>,
    pub bio: Option<String>,
}

/// Failures of the user store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username or email already taken")]
    DuplicateKey,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
