//! HTTP surface of the MyDash proxy.
//!
//! Two read-only JSON endpoints, `/api/weather` and `/api/news`, each backed
//! by its own in-memory cache, plus a health probe.

pub mod error_mapping;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(routes::weather::get_weather))
        .route("/api/news", get(routes::news::get_news))
        .route("/api/health", get(routes::health::health))
        .fallback(routes::not_found)
        .with_state(state)
}
