//! reqwest-backed upstream fetcher.

use std::time::Duration;

use async_trait::async_trait;
use numwin::{Category, FetchError, Fetcher, Number};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::debug;

use crate::config::{GatewayConfig, UpstreamConfig};

/// Upstream body: `{"numbers": [...]}`. A missing or null field is an empty batch.
#[derive(Debug, Deserialize)]
struct NumbersPayload {
    #[serde(default)]
    numbers: Option<Vec<Number>>,
}

pub struct HttpFetcher {
    client: reqwest::Client,
    upstream: UpstreamConfig,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(upstream: UpstreamConfig, fetch_timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            upstream,
            timeout: fetch_timeout,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, FetchError> {
        Self::new(config.upstream.clone(), config.fetch_timeout())
    }

    async fn request(&self, url: &str) -> Result<Vec<Number>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.upstream.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let payload: NumbersPayload = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(payload.numbers.unwrap_or_default())
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            self.timed_out()
        } else {
            FetchError::Transport(err.to_string())
        }
    }

    fn timed_out(&self) -> FetchError {
        FetchError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, category: Category) -> Result<Vec<Number>, FetchError> {
        let url = self.upstream.url_for(category);
        debug!(category = %category, url = %url, "fetching upstream numbers");
        match timeout(self.timeout, self.request(&url)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out()),
        }
    }
}
