/// In-process API stand-ins for flow tests
use super::{
    FileListResponse, MembershipApi, PublishResponse, RestrictionUpdate, SdkApi, SearchApi,
    SearchHit, SearchResponse, ThumbnailApi, ThumbnailSource,
};
use crate::claims::{Claim, FileListItem};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::publish::payload::PublishPayload;
use crate::store::Store;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockSdk {
    pub outputs: Vec<Claim>,
    pub publish_error: Option<String>,
    pub published: Mutex<Vec<PublishPayload>>,
    /// claim id -> items returned by `file_list`
    pub files: Mutex<HashMap<String, Vec<FileListItem>>>,
    pub file_list_calls: AtomicUsize,
}

#[async_trait]
impl SdkApi for MockSdk {
    async fn publish(&self, payload: &PublishPayload) -> ClientResult<PublishResponse> {
        self.published.lock().unwrap().push(payload.clone());
        match &self.publish_error {
            Some(msg) => Err(ClientError::Api(msg.clone())),
            None => Ok(PublishResponse {
                outputs: self.outputs.clone(),
            }),
        }
    }

    async fn file_list(&self, claim_id: &str) -> ClientResult<FileListResponse> {
        self.file_list_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .files
            .lock()
            .unwrap()
            .get(claim_id)
            .cloned()
            .unwrap_or_default();
        Ok(FileListResponse { items })
    }
}

#[derive(Default)]
pub struct MockMemberships {
    pub fail_saves: bool,
    pub saved: Mutex<Vec<RestrictionUpdate>>,
    pub protected: HashMap<String, Vec<String>>,
    pub lookups: AtomicUsize,
}

#[async_trait]
impl MembershipApi for MockMemberships {
    async fn save_restrictions(&self, update: &RestrictionUpdate) -> ClientResult<()> {
        self.saved.lock().unwrap().push(update.clone());
        if self.fail_saves {
            return Err(ClientError::Api("restrictions unavailable".to_string()));
        }
        Ok(())
    }

    async fn protected_content(&self, claim_id: &str) -> ClientResult<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.protected.get(claim_id).cloned().unwrap_or_default())
    }
}

pub struct MockThumbnails {
    pub result: Result<String, String>,
    pub uploads: AtomicUsize,
}

impl Default for MockThumbnails {
    fn default() -> Self {
        Self {
            result: Ok("https://thumbs.example/cover.png".to_string()),
            uploads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ThumbnailApi for MockThumbnails {
    async fn upload(&self, _source: &ThumbnailSource) -> ClientResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(ClientError::ThumbnailUpload)
    }
}

#[derive(Default)]
pub struct MockSearch {
    pub hits: Vec<SearchHit>,
    pub fail: bool,
    pub queries: Mutex<Vec<String>>,
    pub recommendation_queries: Mutex<Vec<String>>,
}

impl MockSearch {
    fn respond(&self) -> ClientResult<SearchResponse> {
        if self.fail {
            return Err(ClientError::Api("search unavailable".to_string()));
        }
        Ok(SearchResponse {
            body: self.hits.clone(),
            powered_by: Some("mock".to_string()),
        })
    }
}

#[async_trait]
impl SearchApi for MockSearch {
    async fn search(&self, query_string: &str) -> ClientResult<SearchResponse> {
        self.queries.lock().unwrap().push(query_string.to_string());
        self.respond()
    }

    async fn search_recommendations(&self, query_string: &str) -> ClientResult<SearchResponse> {
        self.recommendation_queries
            .lock()
            .unwrap()
            .push(query_string.to_string());
        self.respond()
    }
}

pub struct Mocks {
    pub sdk: Arc<MockSdk>,
    pub memberships: Arc<MockMemberships>,
    pub thumbnails: Arc<MockThumbnails>,
    pub search: Arc<MockSearch>,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            sdk: Arc::new(MockSdk::default()),
            memberships: Arc::new(MockMemberships::default()),
            thumbnails: Arc::new(MockThumbnails::default()),
            search: Arc::new(MockSearch::default()),
        }
    }
}

impl Mocks {
    pub fn context(&self) -> AppContext {
        let mut config = ClientConfig::default();
        config.reflector.poll_interval_secs = 1;
        AppContext::with_clients(
            config,
            Store::new(),
            self.sdk.clone(),
            self.memberships.clone(),
            self.thumbnails.clone(),
            self.search.clone(),
        )
    }
}
