//! Centralized error types for the MyDash proxy.
//!
//! Every failure a proxy route can hit is a `ProxyError` variant. The route
//! layer decides the response body; this module only decides the HTTP status
//! and whether a client could sensibly try again.

use thiserror::Error;

/// Failure taxonomy for the weather and news proxies.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid upstream response: {0}")]
    InvalidShape(String),
}

impl ProxyError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::InvalidInput(_) => 400,
            ProxyError::Timeout => 504,
            ProxyError::Configuration(_)
            | ProxyError::Upstream { .. }
            | ProxyError::Network(_)
            | ProxyError::InvalidShape(_) => 500,
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProxyError::Timeout | ProxyError::Network(_) => true,
            ProxyError::Upstream { status, .. } => *status >= 500 || *status == 429,
            ProxyError::Configuration(_)
            | ProxyError::InvalidInput(_)
            | ProxyError::InvalidShape(_) => false,
        }
    }

    /// Short machine-readable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Configuration(_) => "configuration",
            ProxyError::InvalidInput(_) => "invalid_input",
            ProxyError::Timeout => "timeout",
            ProxyError::Upstream { .. } => "upstream",
            ProxyError::Network(_) => "network",
            ProxyError::InvalidShape(_) => "invalid_shape",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_proxy_error(self) -> ProxyError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_proxy_error(self) -> ProxyError {
        if self.is_timeout() {
            ProxyError::Timeout
        } else if self.is_decode() {
            ProxyError::InvalidShape(self.without_url().to_string())
        } else if let Some(status) = self.status() {
            ProxyError::Upstream {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            // Strip the URL: it carries the API key in its query string
            ProxyError::Network(self.without_url().to_string())
        }
    }
}
