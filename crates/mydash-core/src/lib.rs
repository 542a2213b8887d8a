pub mod config;
pub mod error;

pub use config::{
    Config, ConfigValidationError, NewsConfig, ServerConfig, UpstreamConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{ConfigError, ProxyError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging and load a `.env` file from the working directory if present.
pub fn init() -> Result<()> {
    // A missing .env is the normal case in production
    let dotenv_path = dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    tracing::info!("MyDash core initialized");
    Ok(())
}
