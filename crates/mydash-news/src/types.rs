use serde::{Deserialize, Serialize};

/// Headline list served to the dashboard news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub news_results: Vec<NewsArticle>,
    /// Upstream search metadata, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub source_name: String,
    pub published_at: String,
    pub link: String,
}

// SerpApi google_news result. Top stories carry their fields directly;
// story clusters nest the lead story under `highlight`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiStory {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub source: Option<ApiSource>,
    pub date: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiSource {
    pub name: Option<String>,
}
