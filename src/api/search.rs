/// Search backend client
use super::{SearchApi, SearchResponse};
use crate::config::SearchConfig;
use crate::error::{ClientError, ClientResult};
use crate::search::uri::normalize_search_endpoint;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub struct LighthouseClient {
    http_client: Client,
    endpoint: String,
    alt_endpoint: String,
    /// Pre-encoded `&user_id=...` suffix for recommendation queries
    user_suffix: String,
}

impl LighthouseClient {
    pub fn new(config: &SearchConfig, timeout_secs: u64) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: normalize_search_endpoint(&config.api_url),
            alt_endpoint: config.api_alt_url.clone(),
            user_suffix: config
                .user_id
                .as_deref()
                .map(|id| format!("&user_id={}", urlencoding::encode(id)))
                .unwrap_or_default(),
        })
    }

    async fn fetch(&self, url: &str) -> ClientResult<SearchResponse> {
        debug!("Search request: {}", url);
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "Search failed with status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SearchApi for LighthouseClient {
    async fn search(&self, query_string: &str) -> ClientResult<SearchResponse> {
        self.fetch(&format!("{}?{}", self.endpoint, query_string))
            .await
    }

    async fn search_recommendations(&self, query_string: &str) -> ClientResult<SearchResponse> {
        self.fetch(&format!(
            "{}?{}{}",
            self.alt_endpoint, query_string, self.user_suffix
        ))
        .await
    }
}
