use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

/// Which scoring strategy the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Keyword,
    Llm,
}

impl FromStr for ScorerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(ScorerBackend::Keyword),
            "llm" => Ok(ScorerBackend::Llm),
            other => Err(anyhow!("unknown scorer backend '{other}' (expected 'keyword' or 'llm')")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub scorer_backend: ScorerBackend,
    /// Required only when `scorer_backend` is `Llm`.
    pub cohere_api_key: Option<String>,
    pub retry_base_delay: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let scorer_backend: ScorerBackend =
            parse_or(&lookup, "SCORER_BACKEND", ScorerBackend::Keyword)?;

        let cohere_api_key = lookup("COHERE_API_KEY").filter(|k| !k.trim().is_empty());
        if scorer_backend == ScorerBackend::Llm && cohere_api_key.is_none() {
            bail!("Required environment variable 'COHERE_API_KEY' is not set (SCORER_BACKEND=llm)");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080_u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            scorer_backend,
            cohere_api_key,
            retry_base_delay: Duration::from_millis(parse_or(
                &lookup,
                "LLM_RETRY_BASE_DELAY_MS",
                1000_u64,
            )?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024_usize)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
    }
}
