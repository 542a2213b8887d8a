//! SerpApi Google News provider.

use chrono::{DateTime, Timelike, Utc};
use mydash_core::{ConfigError, NewsConfig, ProxyError};
use mydash_proxy::UpstreamClient;
use reqwest::Url;
use serde_json::Value;
use tracing::instrument;

use crate::types::{ApiStory, NewsArticle, NewsResponse};

const SEARCH_PATH: &str = "/search";

/// Cache key for the hour-of-day bucket `now` falls in.
pub fn news_cache_key(now: DateTime<Utc>) -> String {
    format!("news_{}", now.hour())
}

#[derive(Debug, Clone)]
pub struct NewsProvider {
    client: UpstreamClient,
    api_key: Option<String>,
    base_url: String,
    country: String,
    language: String,
}

impl NewsProvider {
    pub fn new(client: UpstreamClient, config: &NewsConfig) -> Self {
        Self {
            client,
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config.country.clone(),
            language: config.language.clone(),
        }
    }

    pub fn api_key(&self) -> Result<&str, ProxyError> {
        self.api_key.as_deref().ok_or_else(|| {
            ConfigError::MissingSetting(mydash_core::config::NEWS_API_KEY_ENV.to_string()).into()
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn search_url(&self) -> Result<Url, ProxyError> {
        let key = self.api_key()?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, SEARCH_PATH))
            .map_err(|e| ConfigError::Invalid(format!("news.base_url: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("engine", "google_news")
            .append_pair("gl", &self.country)
            .append_pair("hl", &self.language)
            .append_pair("api_key", key);

        Ok(url)
    }

    /// Fetch the current headlines, dropping incomplete articles.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self) -> Result<NewsResponse, ProxyError> {
        let url = self.search_url()?;
        let body = self.client.get_json(&url, None).await?;
        transform(body)
    }
}

/// Validate a SerpApi payload and keep only displayable articles.
///
/// The payload must contain a `news_results` array. An article survives only
/// with a non-empty title, source name and link; a missing thumbnail is fine.
pub fn transform(body: Value) -> Result<NewsResponse, ProxyError> {
    let Value::Object(mut root) = body else {
        return Err(ProxyError::InvalidShape(
            "news payload is not an object".to_string(),
        ));
    };

    let results = match root.remove("news_results") {
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(ProxyError::InvalidShape(
                "news_results is not an array".to_string(),
            ))
        }
        None => return Err(ProxyError::InvalidShape("missing news_results".to_string())),
    };

    let total = results.len();
    let news_results: Vec<NewsArticle> = results.into_iter().filter_map(to_article).collect();

    if news_results.len() < total {
        tracing::debug!(
            "Dropped {} of {} news results with missing fields",
            total - news_results.len(),
            total
        );
    }

    Ok(NewsResponse {
        news_results,
        search_metadata: root.remove("search_metadata"),
    })
}

fn to_article(mut result: Value) -> Option<NewsArticle> {
    let story = match result.get_mut("highlight").map(Value::take) {
        Some(highlight @ Value::Object(_)) => highlight,
        _ => result,
    };

    let story: ApiStory = serde_json::from_value(story).ok()?;

    Some(NewsArticle {
        title: non_empty(story.title)?,
        source_name: non_empty(story.source.and_then(|s| s.name))?,
        link: non_empty(story.link)?,
        thumbnail_url: non_empty(story.thumbnail),
        published_at: story.date.unwrap_or_default(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;
    use mydash_proxy::upstream::DEFAULT_TIMEOUT;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn highlight(title: &str, source: Option<&str>, link: &str) -> Value {
        let mut h = json!({
            "title": title,
            "thumbnail": "https://news.google.com/api/attachments/abc",
            "date": "06/01/2024, 07:00 AM, +0000 UTC",
            "link": link
        });
        if let Some(name) = source {
            h["source"] = json!({"name": name, "icon": "https://example.com/icon.png"});
        }
        json!({ "highlight": h })
    }

    fn provider(base_url: &str, api_key: Option<&str>) -> NewsProvider {
        let config = NewsConfig {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            ..NewsConfig::default()
        };
        NewsProvider::new(
            UpstreamClient::with_client(reqwest::Client::new(), DEFAULT_TIMEOUT),
            &config,
        )
    }

    #[test]
    fn test_cache_key_is_hour_bucket() {
        let morning = Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 9, 55, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        assert_eq!(news_cache_key(morning), "news_9");
        assert_eq!(news_cache_key(morning), news_cache_key(later));
        assert_ne!(news_cache_key(morning), news_cache_key(next));
    }

    #[test]
    fn test_drops_article_missing_source_name() {
        let body = json!({
            "news_results": [
                highlight("Incomplete", None, "https://example.com/a"),
                highlight("Complete", Some("Reuters"), "https://example.com/b"),
            ]
        });

        let news = transform(body).unwrap();
        assert_eq!(news.news_results.len(), 1);
        assert_eq!(news.news_results[0].title, "Complete");
        assert_eq!(news.news_results[0].source_name, "Reuters");
    }

    #[test]
    fn test_drops_blank_title_and_link() {
        let body = json!({
            "news_results": [
                highlight("  ", Some("AP"), "https://example.com/a"),
                highlight("No link", Some("AP"), ""),
            ]
        });

        assert!(transform(body).unwrap().news_results.is_empty());
    }

    #[test]
    fn test_keeps_article_without_thumbnail() {
        let body = json!({
            "news_results": [{
                "highlight": {
                    "title": "Markets rally",
                    "source": {"name": "Bloomberg"},
                    "link": "https://example.com/markets"
                }
            }]
        });

        let news = transform(body).unwrap();
        assert_eq!(news.news_results.len(), 1);
        assert!(news.news_results[0].thumbnail_url.is_none());
        assert_eq!(news.news_results[0].published_at, "");
    }

    #[test]
    fn test_reads_top_level_story_fields() {
        let body = json!({
            "news_results": [{
                "position": 1,
                "title": "Top story",
                "source": {"name": "BBC"},
                "link": "https://example.com/top",
                "thumbnail": "https://example.com/t.jpg",
                "date": "06/01/2024"
            }]
        });

        let news = transform(body).unwrap();
        assert_eq!(news.news_results[0].title, "Top story");
        assert_eq!(
            news.news_results[0].thumbnail_url.as_deref(),
            Some("https://example.com/t.jpg")
        );
    }

    #[test]
    fn test_preserves_order_and_metadata() {
        let body = json!({
            "search_metadata": {"google_news_url": "https://news.google.com", "total_results": 2},
            "news_results": [
                highlight("First", Some("A"), "https://example.com/1"),
                highlight("Second", Some("B"), "https://example.com/2"),
            ]
        });

        let news = transform(body).unwrap();
        assert_eq!(news.news_results[0].title, "First");
        assert_eq!(news.news_results[1].title, "Second");
        assert_eq!(news.search_metadata.unwrap()["total_results"], 2);
    }

    #[test]
    fn test_mistyped_article_is_dropped() {
        let body = json!({
            "news_results": [
                {"title": 42, "source": {"name": "X"}, "link": "https://example.com"},
                highlight("Fine", Some("Y"), "https://example.com/ok"),
            ]
        });

        assert_eq!(transform(body).unwrap().news_results.len(), 1);
    }

    #[test]
    fn test_missing_results_is_invalid_shape() {
        assert!(matches!(
            transform(json!({"error": "Your account has run out of searches."})),
            Err(ProxyError::InvalidShape(_))
        ));
        assert!(matches!(
            transform(json!({"news_results": {}})),
            Err(ProxyError::InvalidShape(_))
        ));
        assert!(matches!(transform(json!("nope")), Err(ProxyError::InvalidShape(_))));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let provider = provider("https://serpapi.com", None);
        assert!(matches!(
            provider.search_url(),
            Err(ProxyError::Configuration(_))
        ));
    }

    #[test]
    fn test_search_url() {
        let url = provider("https://serpapi.com", Some("k3y")).search_url().unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/search");
        assert!(pairs.contains(&("engine".into(), "google_news".into())));
        assert!(pairs.contains(&("gl".into(), "us".into())));
        assert!(pairs.contains(&("hl".into(), "en".into())));
        assert!(pairs.contains(&("api_key".into(), "k3y".into())));
    }

    #[tokio::test]
    async fn test_fetch_against_mock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("engine", "google_news"))
            .and(query_param("api_key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news_results": [highlight("Headline", Some("AP"), "https://example.com/h")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let news = provider(&mock_server.uri(), Some("test_key")).fetch().await.unwrap();
        assert_eq!(news.news_results.len(), 1);
    }
}
