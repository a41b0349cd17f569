use anyhow::{bail, Context};
use rand::RngCore;
use serde::Deserialize;

const DEFAULT_TTL_MINUTES: i64 = 60 * 24;
/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://users.db".into());
        let secret = match std::env::var("SESSION_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("SESSION_SECRET not set; generated a per-process secret, sessions will not survive a restart");
                random_secret()
            }
        };
        let session = SessionConfig {
            secret,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "pylearn".into()),
            audience: std::env::var("SESSION_AUDIENCE").unwrap_or_else(|_| "pylearn-web".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok())?,
            secure_cookie: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>()?,
            Err(_) => 5000,
        };
        Ok(Self {
            database_url,
            session,
            host,
            port,
        })
    }
}

/// Session lifetime in minutes, `1..=MAX_TTL_MINUTES`; absent means one day.
fn parse_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("SESSION_TTL_MINUTES is not an integer: {raw:?}"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        bail!("SESSION_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
