/// HTTP client for the membership backend
use super::{MembershipApi, RestrictionUpdate};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Standard envelope returned by the membership backend
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ProtectedMembership {
    membership_id: Value,
}

/// Ids come back as numbers or strings depending on the endpoint version
fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct HttpMembershipApi {
    http_client: Client,
    api_url: String,
}

impl HttpMembershipApi {
    pub fn new(api_url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>, what: &str) -> ClientResult<Option<T>> {
        if !envelope.success {
            return Err(ClientError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| format!("Membership backend rejected {}", what)),
            ));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl MembershipApi for HttpMembershipApi {
    async fn save_restrictions(&self, update: &RestrictionUpdate) -> ClientResult<()> {
        debug!(
            "Saving membership restrictions for '{}' on channel {}",
            update.content_name, update.channel_claim_id
        );

        let url = format!("{}/content/restrictions", self.api_url);
        let response = self.http_client.post(&url).json(update).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "Saving restrictions failed with status {}",
                response.status()
            )));
        }

        let envelope: Envelope<Value> = response.json().await?;
        Self::unwrap_envelope(envelope, "restriction update")?;
        Ok(())
    }

    async fn protected_content(&self, claim_id: &str) -> ClientResult<Vec<String>> {
        let url = format!(
            "{}/content/memberships?claim_id={}",
            self.api_url,
            urlencoding::encode(claim_id)
        );
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "Fetching protected content failed with status {}",
                response.status()
            )));
        }

        let envelope: Envelope<Vec<ProtectedMembership>> = response.json().await?;
        let memberships = Self::unwrap_envelope(envelope, "protected content lookup")?;

        Ok(memberships
            .unwrap_or_default()
            .iter()
            .map(|m| id_to_string(&m.membership_id))
            .collect())
    }
}
