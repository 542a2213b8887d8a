//! Google Weather current-conditions provider.

use mydash_core::{ConfigError, ProxyError, WeatherConfig};
use mydash_proxy::UpstreamClient;
use reqwest::Url;
use serde_json::Value;
use tracing::instrument;

use crate::types::{Coordinates, WeatherResponse};

const CONDITIONS_PATH: &str = "/v1/currentConditions:lookup";
const ICON_SUFFIX: &str = ".svg";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: UpstreamClient,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(client: UpstreamClient, config: &WeatherConfig) -> Self {
        Self {
            client,
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The API key, or a configuration error when none is set.
    pub fn api_key(&self) -> Result<&str, ProxyError> {
        self.api_key.as_deref().ok_or_else(|| {
            ConfigError::MissingSetting(mydash_core::config::WEATHER_API_KEY_ENV.to_string())
                .into()
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the lookup URL for `location` in imperial units.
    pub fn conditions_url(&self, location: &Coordinates) -> Result<Url, ProxyError> {
        let key = self.api_key()?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, CONDITIONS_PATH))
            .map_err(|e| ConfigError::Invalid(format!("weather.base_url: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("location.latitude", &location.latitude.to_string())
            .append_pair("location.longitude", &location.longitude.to_string())
            .append_pair("unitsSystem", "IMPERIAL");

        Ok(url)
    }

    /// Fetch and validate current conditions for `location`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Coordinates) -> Result<WeatherResponse, ProxyError> {
        let url = self.conditions_url(location)?;
        let body = self.client.get_json(&url, None).await?;
        transform(body)
    }
}

/// Validate an upstream payload and reshape it into a `WeatherResponse`.
///
/// Temperature and condition text are required. Everything else is read
/// field by field and dropped when absent or of the wrong type.
pub fn transform(body: Value) -> Result<WeatherResponse, ProxyError> {
    if !body.is_object() {
        return Err(ProxyError::InvalidShape(
            "weather payload is not an object".to_string(),
        ));
    }

    let temperature = body
        .pointer("/temperature/degrees")
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite())
        .ok_or_else(|| ProxyError::InvalidShape("missing temperature.degrees".to_string()))?;

    let condition = body
        .pointer("/weatherCondition/description/text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ProxyError::InvalidShape("missing weatherCondition.description.text".to_string())
        })?
        .to_string();

    let icon_url = body
        .pointer("/weatherCondition/iconBaseUri")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(|base| format!("{}{}", base, ICON_SUFFIX));

    let humidity = ["/relativeHumidity", "/humidity"]
        .iter()
        .find_map(|p| body.pointer(p).and_then(Value::as_f64))
        .filter(|h| (0.0..=100.0).contains(h))
        .map(|h| h.round() as u8);

    // Older payloads send `windSpeed` as `{ "value": .. }` or a bare number
    let wind_speed = ["/wind/speed/value", "/windSpeed/value", "/windSpeed"]
        .iter()
        .find_map(|p| body.pointer(p).and_then(Value::as_f64))
        .filter(|v| v.is_finite());

    let unit = body
        .pointer("/temperature/unit")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(WeatherResponse {
        temperature: temperature.round() as i64,
        condition,
        icon_url,
        humidity,
        wind_speed,
        unit,
    })
}
