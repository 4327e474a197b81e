use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_RESULT_TTL_SECS: u64 = 30 * 24 * 3600;

/// Application configuration loaded explicitly from environment variables.
///
/// Redis is optional; without it, results survive only as long as the
/// process. The Gemini client reads its own `GEMINI_*` variables separately.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables
    /// result persistence across restarts.
    pub redis_url: Option<String>,
    /// TTL for results persisted to Redis, in seconds.
    pub result_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `BIND_ADDR`: listen address (default "0.0.0.0:5000")
    /// - `REDIS_URL`: Redis connection string (omit to keep results in memory only)
    /// - `RESULT_TTL_SECS`: Redis result TTL in seconds (default 30 days)
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr_raw =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw.parse::<SocketAddr>().map_err(|e| {
            AppError::Config(format!("invalid BIND_ADDR '{bind_addr_raw}': {e}"))
        })?;

        let redis_url = std::env::var("REDIS_URL").ok();

        let result_ttl_secs = match std::env::var("RESULT_TTL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("invalid RESULT_TTL_SECS '{raw}': {e}"))
            })?,
            Err(_) => DEFAULT_RESULT_TTL_SECS,
        };

        Ok(Self {
            bind_addr,
            redis_url,
            result_ttl_secs,
        })
    }
}
