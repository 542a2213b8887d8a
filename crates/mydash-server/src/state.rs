//! Process-wide state handed to every route.

use std::sync::Arc;

use mydash_core::{Config, ProxyError};
use mydash_news::{NewsProvider, NewsResponse};
use mydash_proxy::{CachedResource, Clock, UpstreamClient};
use mydash_weather::{WeatherProvider, WeatherResponse};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    weather: WeatherService,
    news: NewsService,
    expose_error_details: bool,
}

pub struct WeatherService {
    pub provider: WeatherProvider,
    pub cache: CachedResource<WeatherResponse>,
}

pub struct NewsService {
    pub provider: NewsProvider,
    pub cache: CachedResource<NewsResponse>,
}

impl AppState {
    /// Build providers and empty caches from `config`.
    ///
    /// Missing API keys are not an error here; the affected route reports
    /// them on each request.
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ProxyError> {
        let client = UpstreamClient::new(&config.upstream)?;

        let weather = WeatherService {
            provider: WeatherProvider::new(client.clone(), &config.weather),
            cache: CachedResource::in_memory("weather", clock.clone(), config.weather.ttl()),
        };
        let news = NewsService {
            provider: NewsProvider::new(client, &config.news),
            cache: CachedResource::in_memory("news", clock, config.news.ttl()),
        };

        if !weather.provider.is_configured() {
            tracing::warn!("Weather API key not configured");
        }
        if !news.provider.is_configured() {
            tracing::warn!("News API key not configured");
        }

        Ok(Self {
            inner: Arc::new(Inner {
                weather,
                news,
                expose_error_details: config.server.expose_error_details,
            }),
        })
    }

    pub fn weather(&self) -> &WeatherService {
        &self.inner.weather
    }

    pub fn news(&self) -> &NewsService {
        &self.inner.news
    }

    pub fn expose_error_details(&self) -> bool {
        self.inner.expose_error_details
    }
}
