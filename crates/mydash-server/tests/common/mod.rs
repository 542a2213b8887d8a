#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use mydash_core::Config;
use mydash_proxy::ManualClock;
use mydash_server::AppState;
use tower::ServiceExt;

pub const WEATHER_KEY: &str = "test_weather_key";
pub const NEWS_KEY: &str = "test_news_key";

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// Config pointing both upstreams at `base_url` with keys set.
pub fn config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.weather.base_url = base_url.to_string();
    config.weather.api_key = Some(WEATHER_KEY.to_string());
    config.news.base_url = base_url.to_string();
    config.news.api_key = Some(NEWS_KEY.to_string());
    config.server.expose_error_details = true;
    config
}

pub fn app(config: &Config) -> TestApp {
    app_at(config, start_time())
}

pub fn app_at(config: &Config, start: DateTime<Utc>) -> TestApp {
    let clock = Arc::new(ManualClock::new(start));
    let state = AppState::new(config, clock.clone()).unwrap();
    TestApp {
        router: mydash_server::router(state),
        clock,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn weather_payload(degrees: f64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "currentTime": "2024-06-01T09:00:00Z",
        "temperature": {"degrees": degrees, "unit": "FAHRENHEIT"},
        "weatherCondition": {
            "iconBaseUri": "https://maps.gstatic.com/weather/v1/partly_cloudy",
            "description": {"text": text, "languageCode": "en"},
            "type": "PARTLY_CLOUDY"
        },
        "relativeHumidity": 55,
        "wind": {"speed": {"value": 9, "unit": "MILES_PER_HOUR"}}
    })
}

pub fn news_highlight(title: &str, source: Option<&str>, link: &str) -> serde_json::Value {
    let mut highlight = serde_json::json!({
        "title": title,
        "thumbnail": "https://news.google.com/api/attachments/thumb",
        "date": "06/01/2024, 08:00 AM, +0000 UTC",
        "link": link
    });
    if let Some(name) = source {
        highlight["source"] = serde_json::json!({"name": name});
    }
    serde_json::json!({ "highlight": highlight })
}
