use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL the upstream endpoints (`/generate`, `/library`, ...) hang off.
    pub upstream_base_url: String,
    pub upstream_api_key: Option<String>,
    pub upstream_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub brand_voice_sample_threshold: usize,
    /// Sessions untouched for this long are dropped by the background sweeper.
    pub session_idle_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upstream_base_url: require_env("UPSTREAM_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            upstream_api_key: std::env::var("UPSTREAM_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            upstream_timeout_secs: parse_env_or("UPSTREAM_TIMEOUT_SECS", 120)?,
            search_debounce_ms: parse_env_or("SEARCH_DEBOUNCE_MS", 500)?,
            brand_voice_sample_threshold: parse_env_or("BRAND_VOICE_SAMPLE_THRESHOLD", 3)?,
            session_idle_ttl_secs: parse_env_or("SESSION_IDLE_TTL_SECS", 3600)?,
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_base_url: "http://localhost:3000/api".to_string(),
            upstream_api_key: None,
            upstream_timeout_secs: 120,
            search_debounce_ms: 500,
            brand_voice_sample_threshold: 3,
            session_idle_ttl_secs: 3600,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
