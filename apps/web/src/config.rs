use std::time::Duration;

use anyhow::{Context, Result};

use crate::form::registry::DEFAULT_IDLE_TTL_SECS;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so the service starts with an empty env.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation_url: String,
    pub generation_timeout: Duration,
    /// Results go to Redis when set, otherwise they stay in process memory.
    pub redis_url: Option<String>,
    pub result_ttl_secs: u64,
    /// Form sessions untouched for this long are dropped.
    pub form_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

pub const DEFAULT_GENERATION_URL: &str = "http://localhost:8000/generate-resume";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generation_url: std::env::var("GENERATION_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_URL.to_string()),
            generation_timeout: Duration::from_secs(
                parse_env("GENERATION_TIMEOUT_SECS", 120)
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            redis_url: std::env::var("REDIS_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            result_ttl_secs: parse_env("RESULT_TTL_SECS", 3600)
                .context("RESULT_TTL_SECS must be a whole number of seconds")?,
            form_idle_secs: parse_env("FORM_IDLE_SECS", DEFAULT_IDLE_TTL_SECS)
                .context("FORM_IDLE_SECS must be a whole number of seconds")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            generation_timeout: Duration::from_secs(120),
            redis_url: None,
            result_ttl_secs: 3600,
            form_idle_secs: DEFAULT_IDLE_TTL_SECS,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u64 = parse_env("RESUMECHEF_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUMECHEF_TEST_BAD_PORT", "eighty");
        assert!(parse_env::<u16>("RESUMECHEF_TEST_BAD_PORT", 8080).is_err());
        std::env::set_var("RESUMECHEF_TEST_GOOD_PORT", " 9090 ");
        assert_eq!(parse_env::<u16>("RESUMECHEF_TEST_GOOD_PORT", 8080).unwrap(), 9090);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation_url, DEFAULT_GENERATION_URL);
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert!(config.redis_url.is_none());
        assert_eq!(config.form_idle_secs, 2 * 60 * 60);
    }
}
