//! Session gate: maps an opaque cookie token to a user id.
//!
//! Handlers receive a [`SessionContext`] extractor that has already resolved the caller's
//! identity for the current request. `establish` and `clear` return the cookie jar that must
//! be sent back with the response.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult, AuthError};
use crate::state::AppState;

const TOKEN_LEN: usize = 43;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()>;
    /// Expired entries read as absent.
    async fn get(&self, token: &str) -> anyhow::Result<Option<Uuid>>;
    async fn remove(&self, token: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: Uuid,
    expires_at: OffsetDateTime,
}

/// Process-local session store.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        let now = OffsetDateTime::now_utc();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            token.to_string(),
            SessionEntry {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<Uuid>> {
        let entry = self.entries.read().await.get(token).copied();
        match entry {
            Some(e) if e.expires_at > OffsetDateTime::now_utc() => Ok(Some(e.user_id)),
            Some(_) => {
                self.entries.write().await.remove(token);
                debug!("expired session pruned");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(token);
        Ok(())
    }
}

fn new_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Per-request view of the caller's session.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    config: Arc<SessionConfig>,
    jar: CookieJar,
    token: Option<String>,
    user_id: Option<Uuid>,
}

impl SessionContext {
    pub fn current_user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// The bound user id, or `AuthError::NoSession`.
    pub fn require_user(&self) -> AppResult<Uuid> {
        self.user_id.ok_or(AppError::Auth(AuthError::NoSession))
    }

    /// Bind a fresh token to `user_id`. Any previous token for this client is dropped.
    pub async fn establish(self, user_id: Uuid) -> AppResult<CookieJar> {
        if let Some(old) = &self.token {
            self.store.remove(old).await?;
        }
        let token = new_token();
        let ttl = Duration::minutes(self.config.ttl_minutes_bounded());
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(ttl)
            .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?;
        self.store.insert(&token, user_id, expires_at).await?;
        info!(%user_id, "session established");

        let cookie = Cookie::build((self.config.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure)
            .max_age(ttl);
        Ok(self.jar.add(cookie))
    }

    /// Unbind the session. Safe on an anonymous session.
    pub async fn clear(self) -> AppResult<CookieJar> {
        if let Some(token) = &self.token {
            self.store.remove(token).await?;
            info!(user_id = ?self.user_id, "session cleared");
        }
        let removal = Cookie::build((self.config.cookie_name.clone(), String::new())).path("/");
        Ok(self.jar.remove(removal))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty());

        let user_id = match &token {
            Some(t) => state.sessions.get(t).await?,
            None => None,
        };

        Ok(Self {
            store: state.sessions.clone(),
            config: Arc::new(state.config.session.clone()),
            jar,
            token,
            user_id,
        })
    }
}
