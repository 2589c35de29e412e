use serde::Deserialize;
use tracing::warn;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_minutes: i64,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".into(),
            ttl_minutes: 60 * 24,
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            ttl_minutes: session_ttl(parse_env("SESSION_TTL_MINUTES"), defaults.ttl_minutes),
            secure: parse_env("SESSION_COOKIE_SECURE").unwrap_or(defaults.secure),
        };
        Ok(Self {
            database_url,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_env("APP_PORT").unwrap_or(5555),
            session,
        })
    }
}

impl SessionConfig {
    /// `ttl_minutes` clamped to `1..=MAX_SESSION_TTL_MINUTES`.
    pub fn ttl_minutes_bounded(&self) -> i64 {
        self.ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES)
    }
}

fn session_ttl(raw: Option<i64>, default: i64) -> i64 {
    match raw {
        None => default,
        Some(m) if (1..=MAX_SESSION_TTL_MINUTES).contains(&m) => m,
        Some(m) => {
            warn!(
                value = m,
                max = MAX_SESSION_TTL_MINUTES,
                "SESSION_TTL_MINUTES out of range, using default"
            );
            default
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
