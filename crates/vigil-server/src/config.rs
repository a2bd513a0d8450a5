//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use vigil_upstream::UpstreamConfig;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream model and speech API endpoints. Keys come from the
    /// environment only.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Per-IP request limits on `/api` routes.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Values exposed to the page.
    #[serde(default)]
    pub app: AppConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API cross-origin. Empty means
    /// same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vigil_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per client IP per minute.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name reported by `GET /api/env`.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_environment() -> String {
    "production".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reads a TOML file, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn read_config_file(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::FileRead(e)),
        },
        None => Ok(Config::default()),
    }
}

/// Loads configuration from a TOML file, then applies the environment.
///
/// Environment variable overrides:
/// - `VIGIL_HOST` overrides `server.host`
/// - `VIGIL_PORT` overrides `server.port` (`PORT` is accepted too)
/// - `VIGIL_LOG_LEVEL` overrides `logging.level`
/// - `VIGIL_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `VIGIL_RATE_LIMIT` overrides `rate_limit.requests_per_minute`
/// - `NODE_ENV` overrides `app.environment`
///
/// Upstream credentials are read from `GROQ_API_KEY`, `OPENAI_API_KEY` and
/// `GOOGLE_TTS_API_KEY`.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = read_config_file(path)?;

    if let Ok(host) = std::env::var("VIGIL_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("VIGIL_PORT").or_else(|_| std::env::var("PORT")) {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("VIGIL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("VIGIL_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(limit) = std::env::var("VIGIL_RATE_LIMIT") {
        if let Ok(parsed) = limit.parse() {
            config.rate_limit.requests_per_minute = parsed;
        }
    }
    if let Ok(env) = std::env::var("NODE_ENV") {
        if !env.trim().is_empty() {
            config.app.environment = env;
        }
    }

    config.upstream = config.upstream.with_env_credentials();

    Ok(config)
}
