use anyhow::Context;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, AppResult, AuthError, StoreError, ValidationError};

/// Signup input after presence checks.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Username is trimmed; password is taken verbatim. Both must be non-empty.
pub fn validate_registration(
    username: Option<String>,
    password: Option<String>,
    image_url: Option<String>,
    bio: Option<String>,
) -> Result<Registration, ValidationError> {
    let username = username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(ValidationError::MissingField("username"))?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or(ValidationError::MissingField("password"))?;
    Ok(Registration {
        username,
        password,
        image_url,
        bio,
    })
}

/// Argon2 runs on the blocking pool.
pub async fn create_user(users: &dyn UserStore, reg: Registration) -> AppResult<User> {
    let password = reg.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")??;
    let new = NewUser {
        username: reg.username,
        password_hash,
        image_url: reg.image_url,
        bio: reg.bio,
    };
    match users.insert(new).await {
        Ok(user) => Ok(user),
        Err(StoreError::UniqueViolation) => Err(ValidationError::DuplicateUsername.into()),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_username(users: &dyn UserStore, username: &str) -> AppResult<Option<User>> {
    Ok(users.find_by_username(username).await?)
}

pub async fn find_by_id(users: &dyn UserStore, id: Uuid) -> AppResult<Option<User>> {
    Ok(users.find_by_id(id).await?)
}

/// Resolve a username/password pair to its user. Unknown users and wrong passwords are
/// indistinguishable to the caller.
pub async fn authenticate(
    users: &dyn UserStore,
    username: Option<&str>,
    password: Option<&str>,
) -> AppResult<User> {
    let (Some(username), Some(password)) = (username.map(str::trim), password) else {
        return Err(AuthError::InvalidCredentials.into());
    };
    let Some(user) = find_by_username(users, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AuthError::InvalidCredentials.into());
    };
    let candidate = password.to_owned();
    let stored = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
        .await
        .context("password verification task failed")?;
    if !matches {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }
    debug!(user_id = %user.id, "credentials verified");
    Ok(user)
}
