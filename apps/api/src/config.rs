use anyhow::{Context, Result};

const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_INFERENCE_MODEL: &str = "microsoft/DialoGPT-medium";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seeds the gateway of every new session. Sessions can still set their own.
    pub huggingface_api_key: Option<String>,
    pub inference_base_url: String,
    pub inference_model: String,
    pub session_idle_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            huggingface_api_key: optional_env("HUGGINGFACE_API_KEY"),
            inference_base_url: optional_env("INFERENCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string()),
            inference_model: optional_env("INFERENCE_MODEL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string()),
            session_idle_timeout_secs: std::env::var("SESSION_IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_TIMEOUT_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank variables both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
