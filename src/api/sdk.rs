/// JSON-RPC client for the SDK daemon
use super::{FileListResponse, PublishResponse, SdkApi};
use crate::error::{ClientError, ClientResult, SDK_FETCH_TIMEOUT};
use crate::publish::payload::PublishPayload;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

pub struct SdkClient {
    http_client: Client,
    url: String,
    next_id: AtomicU64,
}

impl SdkClient {
    pub fn new(url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("SDK call {} (id={})", method, id);

        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Api(format!("{} timed out: {}", method, SDK_FETCH_TIMEOUT))
                } else {
                    ClientError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "SDK returned status {} for {}",
                response.status(),
                method
            )));
        }

        let rpc: RpcResponse<T> = response.json().await?;

        if let Some(error) = rpc.error {
            debug!("SDK error for {}: code={:?}", method, error.code);
            return Err(ClientError::Api(error.message));
        }

        rpc.result
            .ok_or_else(|| ClientError::Api(format!("SDK returned no result for {}", method)))
    }
}

#[async_trait]
impl SdkApi for SdkClient {
    async fn publish(&self, payload: &PublishPayload) -> ClientResult<PublishResponse> {
        self.call("publish", serde_json::to_value(payload)?).await
    }

    async fn file_list(&self, claim_id: &str) -> ClientResult<FileListResponse> {
        self.call("file_list", json!({ "claim_id": claim_id }))
            .await
    }
}
