use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const SESSION_FILE: &str = "session.json";

/// Client configuration loaded from environment variables.
/// Every variable has a default; only malformed values are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub home: PathBuf,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = std::env::var("PATHWAY_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = std::env::var("PATHWAY_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .context("PATHWAY_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_url,
            home: pathway_home()?,
            http_timeout: Duration::from_secs(timeout_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Location of the persisted session (user id, latest assessment).
    pub fn session_path(&self) -> PathBuf {
        self.home.join(SESSION_FILE)
    }
}

fn pathway_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("PATHWAY_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = std::env::var("HOME")
        .context("Neither PATHWAY_HOME nor HOME is set; cannot locate the session directory")?;
    Ok(PathBuf::from(home).join(".pathway"))
}
