use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domains::listings::identifiers::IdentifierGenerator;
use crate::kernel::{RetryPolicy, GPT_4O};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub record_delay: Duration,
    pub retry_policy: RetryPolicy,
    pub track_issued_ids: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RetryPolicy::default();

        let retry_policy = RetryPolicy {
            max_attempts: parse_or(&lookup, "GENERATION_MAX_ATTEMPTS", defaults.max_attempts)?,
            transient_delay: millis_or(&lookup, "GENERATION_RETRY_DELAY_MS", defaults.transient_delay)?,
            format_delay: millis_or(
                &lookup,
                "GENERATION_FORMAT_RETRY_DELAY_MS",
                defaults.format_delay,
            )?,
            backoff_factor: parse_or(&lookup, "GENERATION_BACKOFF_FACTOR", defaults.backoff_factor)?,
            max_delay: millis_or(&lookup, "GENERATION_MAX_DELAY_MS", defaults.max_delay)?,
            retry_invalid_json: parse_or(
                &lookup,
                "GENERATION_RETRY_INVALID_JSON",
                defaults.retry_invalid_json,
            )?,
        };

        Ok(Self {
            openai_api_key: lookup("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| GPT_4O.to_string()),
            openai_base_url: lookup("OPENAI_BASE_URL"),
            input_path: lookup("INPUT_PATH")
                .unwrap_or_else(|| "gemini.json".to_string())
                .into(),
            output_path: lookup("OUTPUT_PATH")
                .unwrap_or_else(|| "seo_optimized_jobs.json".to_string())
                .into(),
            record_delay: millis_or(&lookup, "RECORD_DELAY_MS", Duration::from_millis(1500))?,
            retry_policy,
            track_issued_ids: parse_or(&lookup, "TRACK_ISSUED_IDS", true)?,
        })
    }

    pub fn identifier_generator(&self) -> IdentifierGenerator {
        if self.track_issued_ids {
            IdentifierGenerator::new()
        } else {
            IdentifierGenerator::untracked()
        }
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
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", key, raw)),
        None => Ok(default),
    }
}

fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let fallback = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, fallback).map(Duration::from_millis)
}
