/// Remote API clients
///
/// Each backend sits behind a trait so flows can run against the real HTTP
/// clients or an in-process stand-in.
pub mod membership;
pub mod sdk;
pub mod search;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod testing;

pub use membership::HttpMembershipApi;
pub use sdk::SdkClient;
pub use search::LighthouseClient;
pub use thumbnail::HttpThumbnailApi;

use crate::claims::{Claim, FileListItem};
use crate::error::ClientResult;
use crate::publish::payload::PublishPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of an SDK `publish` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishResponse {
    #[serde(default)]
    pub outputs: Vec<Claim>,
}

/// Result of an SDK `file_list` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub items: Vec<FileListItem>,
}

/// Membership restriction update for one piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionUpdate {
    pub channel_claim_id: String,
    /// Absent for content that does not exist yet
    pub content_claim_id: Option<String>,
    pub content_name: String,
    /// Comma-separated membership ids; empty clears the restrictions
    pub membership_ids: String,
    pub is_new_content: Option<bool>,
}

/// One hit from the search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    #[serde(rename = "claimId")]
    pub claim_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub body: Vec<SearchHit>,
    #[serde(rename = "poweredBy", default)]
    pub powered_by: Option<String>,
}

/// Image bytes to upload as a thumbnail
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailSource {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ThumbnailSource {
    /// Read an image file, deriving the mime type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "png".to_string());

        Ok(Self {
            file_name,
            mime_type: format!("image/{}", extension),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// SDK daemon (JSON-RPC)
#[async_trait]
pub trait SdkApi: Send + Sync {
    async fn publish(&self, payload: &PublishPayload) -> ClientResult<PublishResponse>;

    async fn file_list(&self, claim_id: &str) -> ClientResult<FileListResponse>;
}

/// Membership backend
#[async_trait]
pub trait MembershipApi: Send + Sync {
    async fn save_restrictions(&self, update: &RestrictionUpdate) -> ClientResult<()>;

    /// Membership ids guarding a content claim
    async fn protected_content(&self, claim_id: &str) -> ClientResult<Vec<String>>;
}

/// Thumbnail CDN
#[async_trait]
pub trait ThumbnailApi: Send + Sync {
    /// Upload an image and return its public URL
    async fn upload(&self, source: &ThumbnailSource) -> ClientResult<String>;
}

/// Search backend
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query_string: &str) -> ClientResult<SearchResponse>;

    /// Related-content search on the recommendation endpoint
    async fn search_recommendations(&self, query_string: &str) -> ClientResult<SearchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_shape() {
        let response: SearchResponse = serde_json::from_str(
            r#"{ "body": [{ "name": "@chan", "claimId": "ab12" }], "poweredBy": "lighthouse" }"#,
        )
        .unwrap();
        assert_eq!(response.body[0].claim_id, "ab12");
        assert_eq!(response.powered_by.as_deref(), Some("lighthouse"));
    }

    #[tokio::test]
    async fn test_thumbnail_source_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.JPG");
        tokio::fs::write(&path, b"not really a jpeg").await.unwrap();

        let source = ThumbnailSource::from_path(&path).await.unwrap();
        assert_eq!(source.file_name, "cover.JPG");
        assert_eq!(source.mime_type, "image/jpg");
        assert_eq!(source.size(), 17);
    }
}
