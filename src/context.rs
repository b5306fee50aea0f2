/// Application context and dependency injection
use crate::{
    api::{
        HttpMembershipApi, HttpThumbnailApi, LighthouseClient, MembershipApi, SdkApi, SdkClient,
        SearchApi, ThumbnailApi,
    },
    config::ClientConfig,
    error::ClientResult,
    store::Store,
};
use std::sync::Arc;

/// Application context holding the store and all remote clients
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub store: Store,
    pub sdk: Arc<dyn SdkApi>,
    pub memberships: Arc<dyn MembershipApi>,
    pub thumbnails: Arc<dyn ThumbnailApi>,
    pub search: Arc<dyn SearchApi>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let timeout = config.sdk.timeout_secs;
        let sdk = Arc::new(SdkClient::new(&config.sdk.url, timeout)?);
        let memberships = Arc::new(HttpMembershipApi::new(&config.membership.api_url, timeout)?);
        let thumbnails = Arc::new(HttpThumbnailApi::new(&config.thumbnail.upload_url, timeout)?);
        let search = Arc::new(LighthouseClient::new(&config.search, timeout)?);

        tracing::info!(
            "Client context ready (sdk: {}, search: {})",
            config.sdk.url,
            config.search.api_url
        );

        Ok(Self::with_clients(
            config,
            Store::new(),
            sdk,
            memberships,
            thumbnails,
            search,
        ))
    }

    /// Assemble a context from already-built clients
    pub fn with_clients(
        config: ClientConfig,
        store: Store,
        sdk: Arc<dyn SdkApi>,
        memberships: Arc<dyn MembershipApi>,
        thumbnails: Arc<dyn ThumbnailApi>,
        search: Arc<dyn SearchApi>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            sdk,
            memberships,
            thumbnails,
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = ClientConfig::default();
        config.sdk.url = String::new();
        assert!(matches!(AppContext::new(config), Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_new_starts_with_empty_store() {
        let ctx = AppContext::new(ClientConfig::default()).unwrap();
        let searching = ctx.store.select(|s| s.search.searching).await;
        assert!(!searching);
        assert_eq!(ctx.config.reflector.poll_interval_secs, 5);
    }
}
