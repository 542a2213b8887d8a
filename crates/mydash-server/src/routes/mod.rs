pub mod health;
pub mod news;
pub mod weather;

use std::time::Duration;

use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mydash_proxy::CacheStatus;
use serde::Serialize;

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// 200 response with browser caching for `ttl` and the cache outcome.
pub(crate) fn cached_json<T: Serialize>(value: &T, status: CacheStatus, ttl: Duration) -> Response {
    let mut response = Json(value).into_response();
    let headers = response.headers_mut();

    if let Ok(cache_control) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs()))
    {
        headers.insert(header::CACHE_CONTROL, cache_control);
    }
    headers.insert(X_CACHE, HeaderValue::from_static(status.as_str()));

    response
}

pub(crate) async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
        .into_response()
}
