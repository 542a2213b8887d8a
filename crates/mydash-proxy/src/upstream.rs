//! Single-attempt HTTP GET against a third-party API with a hard time budget.

use std::time::{Duration, Instant};

use mydash_core::{ProxyError, ReqwestErrorExt, UpstreamConfig};
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use tracing::instrument;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ReqwestErrorExt::into_proxy_error)?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// The whole exchange (connect, headers, body) shares one time budget.
    /// When it runs out the in-flight request is dropped and
    /// `ProxyError::Timeout` is returned. Non-2xx statuses become
    /// `ProxyError::Upstream` carrying whatever body text could be read.
    #[instrument(skip_all, fields(upstream = %redacted(url)), level = "debug")]
    pub async fn get_json(
        &self,
        url: &Url,
        headers: Option<HeaderMap>,
    ) -> Result<serde_json::Value, ProxyError> {
        let started = Instant::now();

        let result = tokio::time::timeout(self.timeout, self.exchange(url, headers)).await;

        match result {
            Ok(outcome) => {
                tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Upstream call finished");
                outcome
            }
            Err(_) => {
                tracing::warn!(
                    upstream = %redacted(url),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Upstream call timed out"
                );
                Err(ProxyError::Timeout)
            }
        }
    }

    async fn exchange(
        &self,
        url: &Url,
        headers: Option<HeaderMap>,
    ) -> Result<serde_json::Value, ProxyError> {
        let mut request = self.client.get(url.clone());
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        let response = request
            .send()
            .await
            .map_err(ReqwestErrorExt::into_proxy_error)?;

        let status = response.status();
        tracing::debug!("Upstream responded with status {}", status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read upstream error body: {}", e.without_url());
                    String::new()
                }
            };
            tracing::error!(status = status.as_u16(), body = %body, "Upstream error response");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(ReqwestErrorExt::into_proxy_error)?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ProxyError::InvalidShape(format!("Response is not JSON: {}", e)))
    }
}

/// Scheme, host and path only; the query string carries API keys.
pub fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
