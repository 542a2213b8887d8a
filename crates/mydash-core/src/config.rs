use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Google Weather API key.
pub const WEATHER_API_KEY_ENV: &str = "GOOGLE_MAPS_APIKEY";

/// Environment variable holding the SerpApi key.
pub const NEWS_API_KEY_ENV: &str = "SERPAPI_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into a single line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Include the underlying error text as `details` in error responses.
    ///
    /// Defaults to on for debug builds only, so production responses never
    /// leak upstream internals.
    #[serde(default = "default_expose_error_details")]
    pub expose_error_details: bool,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_expose_error_details() -> bool {
    cfg!(debug_assertions)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            expose_error_details: default_expose_error_details(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Time budget for a single upstream call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_user_agent() -> String {
    format!("MyDash/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Google Weather API key. Usually supplied through `GOOGLE_MAPS_APIKEY`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Cache lifetime in seconds
    #[serde(default = "default_weather_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://weather.googleapis.com".to_string()
}

fn default_weather_ttl_secs() -> u64 {
    300
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            ttl_secs: default_weather_ttl_secs(),
        }
    }
}

impl WeatherConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// SerpApi key. Usually supplied through `SERPAPI_API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Cache lifetime in seconds
    #[serde(default = "default_news_ttl_secs")]
    pub ttl_secs: u64,

    /// Google News country code (`gl`)
    #[serde(default = "default_country")]
    pub country: String,

    /// Google News interface language (`hl`)
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_news_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_news_ttl_secs() -> u64 {
    600
}

fn default_country() -> String {
    "us".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
            ttl_secs: default_news_ttl_secs(),
            country: default_country(),
            language: default_language(),
        }
    }
}

impl NewsConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Reads `path` when given, otherwise the user config file when it exists,
    /// otherwise falls back to defaults. API keys from the environment are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration and reject it if validation reports errors.
    ///
    /// Warnings are logged and returned alongside the config.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = Self::load(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override API keys from the process environment.
    pub fn apply_env(&mut self) {
        if let Some(key) = env_non_empty(WEATHER_API_KEY_ENV) {
            self.weather.api_key = Some(key);
        }
        if let Some(key) = env_non_empty(NEWS_API_KEY_ENV) {
            self.news.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            result.add_error(
                "server.bind_address",
                format!("Not a socket address: {}", self.server.bind_address),
            );
        }

        if self.upstream.timeout_ms == 0 {
            result.add_error("upstream.timeout_ms", "Timeout must be greater than 0");
        }

        validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        validate_url(&self.news.base_url, "news.base_url", &mut result);

        if self.weather.ttl_secs == 0 {
            result.add_warning("weather.ttl_secs", "Weather caching disabled (0 seconds)");
        }
        if self.news.ttl_secs == 0 {
            result.add_warning("news.ttl_secs", "News caching disabled (0 seconds)");
        }

        // Missing keys are reported per request, so they only warn here
        if !is_set(&self.weather.api_key) {
            result.add_warning(
                "weather.api_key",
                format!("{} not set - /api/weather will fail", WEATHER_API_KEY_ENV),
            );
        }
        if !is_set(&self.news.api_key) {
            result.add_warning(
                "news.api_key",
                format!("{} not set - /api/news will fail", NEWS_API_KEY_ENV),
            );
        }

        result
    }

    /// Path of the user config file (`<config dir>/mydash/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mydash").join("config.toml"))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => result.add_error(field_name, format!("Invalid URL: {}", e)),
    }
}
