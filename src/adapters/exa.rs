use crate::domain::model::SearchResponse;
use crate::domain::ports::{ConfigProvider, SearchProvider};
use crate::utils::error::{PrepError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

#[derive(Debug, Clone)]
pub struct ExaClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl ExaClientConfig {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            base_url: config.exa_base_url().to_string(),
            api_key: config.exa_api_key().map(str::to_string),
            timeout: config.request_timeout(),
            retry_attempts: config.retry_attempts(),
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Exa 搜尋 API 客戶端
pub struct ExaClient {
    client: Client,
    config: ExaClientConfig,
}

impl ExaClient {
    pub fn new(config: ExaClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PrepError::MissingConfig {
                field: "exa_api_key".to_string(),
            })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<SearchResponse> {
        let api_key = self.api_key()?;
        let url = self.endpoint(path);
        let max_attempts = self.config.retry_attempts + 1;
        let mut attempt = 1;

        loop {
            match self.post_once(&url, api_key, &body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.config.retry_delay * attempt;
                    tracing::warn!(
                        "🔁 {} failed (attempt {}/{}): {}; retrying in {:?}",
                        path,
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<SearchResponse> {
        tracing::debug!("📡 POST {}", url);
        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Search API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrepError::SearchApi {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[async_trait]
impl SearchProvider for ExaClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<SearchResponse> {
        self.post(
            "search",
            json!({
                "query": query,
                "useAutoprompt": true,
                "numResults": num_results,
            }),
        )
        .await
    }

    async fn find_similar(&self, url: &str, num_results: usize) -> Result<SearchResponse> {
        self.post(
            "findSimilar",
            json!({
                "url": url,
                "numResults": num_results,
            }),
        )
        .await
    }

    async fn get_contents(&self, ids: &[String]) -> Result<SearchResponse> {
        self.post("contents", json!({ "ids": ids, "text": true })).await
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }
}
