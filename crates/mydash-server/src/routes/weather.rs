//! `GET /api/weather?lat=<float>&lng=<float>`

use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use mydash_core::ProxyError;
use mydash_weather::Coordinates;
use serde::Deserialize;

use crate::error_mapping::{error_response, WEATHER_MESSAGES};
use crate::routes::cached_json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Response {
    let started = Instant::now();

    let location = match query
        .map_err(|e| ProxyError::InvalidInput(e.body_text()))
        .and_then(|Query(q)| Coordinates::parse(q.lat.as_deref(), q.lng.as_deref()))
    {
        Ok(location) => location.rounded(),
        Err(e) => {
            tracing::warn!(status = 400, "Rejected weather request: {}", e);
            return error_response(&e, &WEATHER_MESSAGES, state.expose_error_details());
        }
    };

    let key = location.cache_key();
    let service = state.weather();

    let result = match service.provider.api_key() {
        Ok(_) => {
            service
                .cache
                .get_or_fetch(&key, || service.provider.fetch(&location))
                .await
        }
        Err(e) => Err(e),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(fetched) => {
            tracing::info!(
                status = 200,
                key = %key,
                cache = fetched.status.as_str(),
                elapsed_ms,
                "Weather request served"
            );
            cached_json(&fetched.value, fetched.status, service.cache.ttl())
        }
        Err(e) => {
            tracing::error!(
                status = e.status_code(),
                key = %key,
                kind = e.kind(),
                retryable = e.is_retryable(),
                elapsed_ms,
                "Weather request failed: {}",
                e
            );
            error_response(&e, &WEATHER_MESSAGES, state.expose_error_details())
        }
    }
}
