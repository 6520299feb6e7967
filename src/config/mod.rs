//! Configuration module for the school portal.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Character ceiling of a single remote spreadsheet cell.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 50_000;

/// Default request body ceiling; uploads are held in memory.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Upper bound for the retry base delay, in milliseconds.
pub const MAX_RETRY_BASE_MS: u64 = 60_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file holding the local document copy
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Remote sync endpoint; `None` keeps the portal local-only
    pub remote_url: Option<String>,
    /// Initial connectivity flag
    pub online: bool,
    /// Attempts per remote push
    pub remote_retries: usize,
    /// Base delay for linear retry back-off, in milliseconds
    pub remote_retry_base_ms: u64,
    /// Per-request timeout for the remote endpoint
    pub remote_timeout: Duration,
    /// Approximate remote payload ceiling in characters
    pub payload_limit: usize,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SCHOOL_DB_PATH")
            .unwrap_or_else(|_| "./data/portal.sqlite".to_string())
            .into();

        let bind_addr = env::var("SCHOOL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid SCHOOL_BIND_ADDR format: {}", e))?;

        let log_level = env::var("SCHOOL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let remote_url = env::var("SCHOOL_REMOTE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let online = env::var("SCHOOL_ONLINE")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            remote_url,
            online,
            remote_retries: env_parse("SCHOOL_REMOTE_RETRIES", 3usize).max(1),
            remote_retry_base_ms: env_parse("SCHOOL_REMOTE_RETRY_BASE_MS", 200u64)
                .min(MAX_RETRY_BASE_MS),
            remote_timeout: Duration::from_secs(env_parse("SCHOOL_REMOTE_TIMEOUT_SECS", 15u64)),
            payload_limit: env_parse("SCHOOL_PAYLOAD_LIMIT", DEFAULT_PAYLOAD_LIMIT),
            max_body_bytes: env_parse("SCHOOL_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
