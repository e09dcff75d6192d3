use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analytics::DEFAULT_CAPACITY;
use crate::icebreakers::validation::DEFAULT_MAX_PROFILE_CHARS;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODELS: &str = "gpt-5,gpt-4o";

/// Who the icebreakers are written on behalf of. Embedded verbatim in the prompt.
pub const DEFAULT_SENDER_CONTEXT: &str = "I'm a brand, web & product designer who also sets up \
AI automations (Zapier/n8n) to save teams time and money. I help founders, marketers and SMEs \
turn manual processes into simple tools (reporting, onboarding, lead follow-ups, content ops).";

/// One entry in the ordered model fallback list.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub name: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

/// Application configuration loaded from environment variables.
/// Only malformed values are fatal; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub models: Vec<ModelSpec>,
    pub max_profile_chars: usize,
    pub rate_limit_per_minute: u32,
    pub analytics_capacity: usize,
    pub sender_context: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, "MODEL_TIMEOUT_SECS", 20)?;
        let max_tokens: u32 = parse_or(&lookup, "MODEL_MAX_TOKENS", 800)?;

        let models = parse_models(
            &lookup("OPENAI_MODELS").unwrap_or_else(|| DEFAULT_MODELS.to_string()),
            Duration::from_secs(timeout_secs),
            max_tokens,
        )?;

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            models,
            max_profile_chars: parse_or(&lookup, "MAX_PROFILE_CHARS", DEFAULT_MAX_PROFILE_CHARS)?,
            rate_limit_per_minute: parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 10)?,
            analytics_capacity: parse_or(&lookup, "ANALYTICS_CAPACITY", DEFAULT_CAPACITY)?,
            sender_context: lookup("SENDER_CONTEXT")
                .unwrap_or_else(|| DEFAULT_SENDER_CONTEXT.to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn api_key_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_models(raw: &str, timeout: Duration, max_tokens: u32) -> Result<Vec<ModelSpec>> {
    let models: Vec<ModelSpec> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| ModelSpec {
            name: name.to_string(),
            timeout,
            max_tokens,
        })
        .collect();

    if models.is_empty() {
        bail!("OPENAI_MODELS must name at least one model");
    }
    Ok(models)
}
