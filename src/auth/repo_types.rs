use sqlx::FromRow;
use uuid::Uuid;

use super::password::PasswordHash;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: PasswordHash, // write-only, see `PasswordHash`
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Validated input for a user insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: PasswordHash,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}
