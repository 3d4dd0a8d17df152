use anyhow::{bail, Context, Result};

use crate::layout::default_page_config;

const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 12 * 60;
const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Application configuration loaded from environment variables.
/// Nothing is required; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Chat is disabled when unset.
    pub completion_api_key: Option<String>,
    pub completion_api_url: String,
    pub completion_model: String,
    pub page_margin_mm: f32,
    /// Sessions older than this are treated as signed out.
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            completion_api_key: optional_env("COMPLETION_API_KEY"),
            completion_api_url: optional_env("COMPLETION_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            completion_model: optional_env("COMPLETION_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            page_margin_mm: parse_margin(
                &std::env::var("PAGE_MARGIN_MM").unwrap_or_else(|_| "20".to_string()),
            )
            .context("PAGE_MARGIN_MM is invalid")?,
            session_ttl_minutes: parse_session_ttl(
                &std::env::var("SESSION_TTL_MINUTES")
                    .unwrap_or_else(|_| DEFAULT_SESSION_TTL_MINUTES.to_string()),
            )
            .context("SESSION_TTL_MINUTES is invalid")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            completion_api_key: None,
            completion_api_url: DEFAULT_COMPLETION_URL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            page_margin_mm: 20.0,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

/// A margin must be positive and leave printable space on an A4 page in
/// both directions.
fn parse_margin(raw: &str) -> Result<f32> {
    let margin = raw
        .trim()
        .parse::<f32>()
        .context("must be a number of millimetres")?;
    if !margin.is_finite() || margin <= 0.0 {
        bail!("margin must be a positive number of millimetres, got {margin}");
    }
    let page = default_page_config(margin);
    let shortest_side = page.width_mm.min(page.height_mm);
    if 2.0 * margin >= shortest_side {
        bail!("margin of {margin}mm leaves no printable area on a {shortest_side}mm side");
    }
    Ok(margin)
}

fn parse_session_ttl(raw: &str) -> Result<i64> {
    let minutes = raw
        .trim()
        .parse::<i64>()
        .context("must be a whole number of minutes")?;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        bail!("session lifetime must be between 1 and {MAX_SESSION_TTL_MINUTES} minutes, got {minutes}");
    }
    Ok(minutes)
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
