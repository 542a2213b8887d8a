//! Coordinate parsing and the weather cache key.

use mydash_core::ProxyError;

use crate::types::Coordinates;

/// Round to two decimal places (roughly 1 km), folding `-0` into `0`.
pub fn round_coordinate(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Cache key for a coordinate pair: `"{lat},{lng}"` after rounding.
///
/// Nearby readings (GPS jitter between page loads) collapse onto one key.
pub fn weather_cache_key(latitude: f64, longitude: f64) -> String {
    format!(
        "{},{}",
        round_coordinate(latitude),
        round_coordinate(longitude)
    )
}

impl Coordinates {
    /// Parse raw query values. Both must be present, finite and in range.
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> Result<Self, ProxyError> {
        let latitude = parse_component("lat", lat)?;
        let longitude = parse_component("lng", lng)?;
        Self::new(latitude, longitude)
    }

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ProxyError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ProxyError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ProxyError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// The same point at cache-key precision.
    pub fn rounded(&self) -> Self {
        Self {
            latitude: round_coordinate(self.latitude),
            longitude: round_coordinate(self.longitude),
        }
    }

    pub fn cache_key(&self) -> String {
        weather_cache_key(self.latitude, self.longitude)
    }
}

fn parse_component(name: &str, raw: Option<&str>) -> Result<f64, ProxyError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProxyError::InvalidInput(format!("missing {}", name)))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| ProxyError::InvalidInput(format!("{} is not a number: {}", name, raw)))?;

    // "NaN" and "inf" parse successfully
    if !value.is_finite() {
        return Err(ProxyError::InvalidInput(format!("{} is not finite", name)));
    }
    Ok(value)
}
