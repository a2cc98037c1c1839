use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default request body ceiling for rendering and import: 5 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Without a key the CV import endpoint answers 503.
    pub anthropic_api_key: Option<String>,
    pub chrome_path: Option<PathBuf>,
    pub render_timeout: Duration,
    pub network_idle_timeout: Duration,
    /// Applied both to a declared `Content-Length` and to the body actually read.
    pub max_payload_bytes: usize,
    pub emulate_screen_media: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            chrome_path: optional("CHROME_PATH").map(PathBuf::from),
            render_timeout: Duration::from_secs(parse_or(&lookup, "RENDER_TIMEOUT_SECS", 60)?),
            network_idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "NETWORK_IDLE_TIMEOUT_SECS",
                15,
            )?),
            max_payload_bytes: parse_or(&lookup, "MAX_PAYLOAD_BYTES", DEFAULT_MAX_PAYLOAD_BYTES)?,
            emulate_screen_media: match lookup("EMULATE_SCREEN_MEDIA") {
                Some(v) => parse_bool(&v)
                    .with_context(|| format!("EMULATE_SCREEN_MEDIA must be a boolean, got '{v}'"))?,
                None => true,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
