//! `GET /api/news`

use std::time::Instant;

use axum::extract::State;
use axum::response::Response;
use mydash_news::news_cache_key;

use crate::error_mapping::{error_response, NEWS_MESSAGES};
use crate::routes::cached_json;
use crate::state::AppState;

pub async fn get_news(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let service = state.news();
    let key = news_cache_key(service.cache.now());

    let result = match service.provider.api_key() {
        Ok(_) => {
            service
                .cache
                .get_or_fetch(&key, || service.provider.fetch())
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
                articles = fetched.value.news_results.len(),
                elapsed_ms,
                "News request served"
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
                "News request failed: {}",
                e
            );
            error_response(&e, &NEWS_MESSAGES, state.expose_error_details())
        }
    }
}
