use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration loaded from environment variables (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file backing the key-value store.
    pub store_path: PathBuf,
    /// When set, sample candidates for this job are written into an empty store.
    pub seed_job: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            store_path: std::env::var("TALENTDESK_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("talentdesk.json")),
            seed_job: optional_env("TALENTDESK_SEED_JOB")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset or blank means `None`; a value that is not valid unicode is an error.
fn optional_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Environment variable '{key}' is not valid unicode")),
    }
}
