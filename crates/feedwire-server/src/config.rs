use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use feedwire_push::EXPO_PUSH_URL;

/// Shared secrets that MUST NOT be used.
const PLACEHOLDER_KEYS: &[&str] = &["change-me", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub api_key: String,
    pub push_url: String,
    pub push_access_token: Option<String>,
    pub push_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("FEEDWIRE_API_KEY").unwrap_or_default();
        if api_key.is_empty() || PLACEHOLDER_KEYS.contains(&api_key.as_str()) {
            bail!("FEEDWIRE_API_KEY is unset or still a placeholder; set it in your .env file");
        }

        let port = match var("FEEDWIRE_PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid FEEDWIRE_PORT '{}'", v))?,
            None => 8000,
        };

        let push_timeout_secs: u64 = match var("FEEDWIRE_PUSH_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid FEEDWIRE_PUSH_TIMEOUT_SECS '{}'", v))?,
            None => 30,
        };

        Ok(Self {
            host: var("FEEDWIRE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("FEEDWIRE_DB_PATH").unwrap_or_else(|| "feedwire.db".into()).into(),
            api_key,
            push_url: var("FEEDWIRE_PUSH_URL").unwrap_or_else(|| EXPO_PUSH_URL.into()),
            push_access_token: var("FEEDWIRE_PUSH_ACCESS_TOKEN"),
            push_timeout: Duration::from_secs(push_timeout_secs),
        })
    }
}
