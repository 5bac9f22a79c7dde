//! Application configuration management
//!
//! Configuration is read from a TOML file and the process environment and is
//! validated once at startup. API keys are never compiled in: a missing key
//! aborts startup.

use crate::core::retry::RetryPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default Gemini model
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API base URL
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default YouTube Data API base URL
const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Default maximum retries
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 250;

const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Default server port (the extension talks to localhost:8000)
const DEFAULT_PORT: u16 = 8000;

/// Environment variable overriding `[gemini] api_key`
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding `[youtube] api_key`
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct YouTubeConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_initial_backoff_ms() -> u64 {
    DEFAULT_INITIAL_BACKOFF_MS
}

fn default_backoff_multiplier() -> f64 {
    DEFAULT_BACKOFF_MULTIPLIER
}

/// Raw layout of `config.toml`; every section may be omitted
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model name, e.g. `gemini-2.0-flash`
    pub gemini_model: String,

    /// Gemini API base URL (without the `/models/...` suffix)
    pub gemini_base_url: String,

    /// YouTube Data API key
    pub youtube_api_key: String,

    /// YouTube Data API base URL
    pub youtube_base_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Per-attempt timeout for outbound calls, in seconds
    pub request_timeout: u64,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    pub initial_backoff_ms: u64,

    pub backoff_multiplier: f64,
}

impl Config {
    /// Load configuration from a TOML file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - An API key is missing from both the file and the environment
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content, |name| std::env::var(name).ok())
    }

    /// Load configuration from environment and config file
    ///
    /// Reads `.env` if present, then `CONFIG_PATH` (default `config.toml`).
    /// The default file may be absent, in which case the environment must
    /// supply the API keys; an explicit `CONFIG_PATH` must exist.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(path),
            Err(_) if Path::new("config.toml").exists() => Self::from_file("config.toml"),
            Err(_) => Self::from_parts(TomlConfig::default(), |name| std::env::var(name).ok()),
        }
    }

    /// Parse TOML text and resolve it against an environment lookup
    pub fn from_toml_str<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Self::from_parts(config, env)
    }

    /// Resolve a parsed file against an environment lookup and validate it
    ///
    /// Non-empty environment values take precedence over the file.
    pub fn from_parts<F>(config: TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = resolve_key(&env, GEMINI_API_KEY_ENV, config.gemini.api_key)
            .with_context(|| {
                format!("Gemini API key missing: set {GEMINI_API_KEY_ENV} or [gemini] api_key")
            })?;

        let youtube_api_key = resolve_key(&env, YOUTUBE_API_KEY_ENV, config.youtube.api_key)
            .with_context(|| {
                format!("YouTube API key missing: set {YOUTUBE_API_KEY_ENV} or [youtube] api_key")
            })?;

        let request = config.request;
        if request.request_timeout == 0 {
            bail!("request_timeout must be greater than zero");
        }
        if !request.backoff_multiplier.is_finite() || request.backoff_multiplier < 1.0 {
            bail!(
                "backoff_multiplier must be at least 1.0, got {}",
                request.backoff_multiplier
            );
        }

        Ok(Config {
            gemini_api_key,
            gemini_model: config
                .gemini
                .model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: trim_base_url(
                config.gemini.base_url,
                DEFAULT_GEMINI_BASE_URL,
            ),
            youtube_api_key,
            youtube_base_url: trim_base_url(
                config.youtube.base_url,
                DEFAULT_YOUTUBE_BASE_URL,
            ),
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: request.request_timeout,
            max_retries: request.max_retries,
            initial_backoff_ms: request.initial_backoff_ms,
            backoff_multiplier: request.backoff_multiplier,
        })
    }

    /// Per-attempt timeout for outbound calls
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Retry policy shared by the outbound clients
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.backoff_multiplier,
            self.initial_backoff_ms,
        )
    }
}

fn resolve_key<F>(env: &F, name: &str, from_file: Option<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(name)
        .filter(|key| !key.trim().is_empty())
        .or(from_file)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn trim_base_url(configured: Option<String>, default: &str) -> String {
    configured
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
