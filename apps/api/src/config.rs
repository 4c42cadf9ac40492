use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_PROFILE_API_BASE_URL: &str = "https://alfa-leetcode-api.onrender.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
///
/// `GEMINI_API_KEY` is optional at startup. Without it every analysis run
/// fails at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base_url: Url,
    pub profile_api_base_url: Url,
    pub max_upload_bytes: usize,
    /// How long a session may sit untouched before it is evicted.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base_url: url_env("GEMINI_API_BASE_URL", DEFAULT_GEMINI_API_BASE_URL)?,
            profile_api_base_url: url_env("PROFILE_API_BASE_URL", DEFAULT_PROFILE_API_BASE_URL)?,
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            session_ttl: parse_ttl(optional_env("SESSION_TTL_SECS").as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn url_env(key: &str, default: &str) -> Result<Url> {
    let raw = optional_env(key).unwrap_or_else(|| default.to_string());
    parse_base_url(&raw).with_context(|| format!("Environment variable '{key}' is not a valid URL"))
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        anyhow::bail!("'{raw}' cannot be used as a base URL");
    }
    Ok(url)
}

fn parse_ttl(raw: Option<&str>) -> Result<Duration> {
    let secs = match raw {
        Some(raw) => raw
            .parse::<u64>()
            .context("SESSION_TTL_SECS must be a whole number of seconds")?,
        None => DEFAULT_SESSION_TTL_SECS,
    };
    if secs == 0 {
        anyhow::bail!("SESSION_TTL_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_https() {
        let url = parse_base_url(DEFAULT_PROFILE_API_BASE_URL).unwrap();
        assert_eq!(url.host_str(), Some("alfa-leetcode-api.onrender.com"));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl(None).unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_ttl(Some("90")).unwrap(), Duration::from_secs(90));
        assert!(parse_ttl(Some("0")).is_err());
        assert!(parse_ttl(Some("an hour")).is_err());
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }
}
