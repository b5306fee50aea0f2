/// Multipart upload client for the thumbnail CDN
use super::{ThumbnailApi, ThumbnailSource};
use crate::error::{ClientError, ClientResult, THUMBNAIL_SERVICE_DOWN, THUMBNAIL_UPLOAD_REJECTED};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct HttpThumbnailApi {
    http_client: Client,
    upload_url: String,
}

impl HttpThumbnailApi {
    pub fn new(upload_url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            upload_url: upload_url.to_string(),
        })
    }
}

/// Interpret the CDN's reply body
fn parse_reply(text: &str) -> ClientResult<String> {
    let reply: UploadReply = if text.is_empty() {
        UploadReply::default()
    } else {
        serde_json::from_str(text).map_err(|_| ClientError::ThumbnailUpload(text.to_string()))?
    };

    if reply.kind.as_deref() != Some("success") {
        return Err(ClientError::ThumbnailUpload(
            reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| THUMBNAIL_UPLOAD_REJECTED.to_string()),
        ));
    }

    reply
        .message
        .ok_or_else(|| ClientError::ThumbnailUpload(THUMBNAIL_UPLOAD_REJECTED.to_string()))
}

#[async_trait]
impl ThumbnailApi for HttpThumbnailApi {
    async fn upload(&self, source: &ThumbnailSource) -> ClientResult<String> {
        debug!(
            "Uploading thumbnail {} ({} bytes, {})",
            source.file_name,
            source.size(),
            source.mime_type
        );

        let part = Part::bytes(source.bytes.clone())
            .file_name(source.file_name.clone())
            .mime_str(&source.mime_type)?;
        let form = Form::new()
            .part("file-input", part)
            .text("upload", "Upload");

        let response = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ClientError::ThumbnailUpload(THUMBNAIL_SERVICE_DOWN.to_string())
                } else {
                    ClientError::Http(e)
                }
            })?;

        let text = response.text().await?;
        parse_reply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> ThumbnailSource {
        ThumbnailSource {
            file_name: "cover.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"PNGX".to_vec(),
        }
    }

    #[test]
    fn test_parse_reply_variants() {
        assert_eq!(
            parse_reply(r#"{"type":"success","message":"https://cdn/x.png"}"#).unwrap(),
            "https://cdn/x.png"
        );

        match parse_reply("") {
            Err(ClientError::ThumbnailUpload(msg)) => assert_eq!(msg, THUMBNAIL_UPLOAD_REJECTED),
            other => panic!("unexpected: {:?}", other),
        }

        match parse_reply("<html>502</html>") {
            Err(ClientError::ThumbnailUpload(msg)) => assert_eq!(msg, "<html>502</html>"),
            other => panic!("unexpected: {:?}", other),
        }

        match parse_reply(r#"{"type":"error","message":"too wide"}"#) {
            Err(ClientError::ThumbnailUpload(msg)) => assert_eq!(msg, "too wide"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("name=\"file-input\""))
            .and(body_string_contains("name=\"upload\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "success",
                "message": "https://thumbs/cover.png"
            })))
            .mount(&server)
            .await;

        let api = HttpThumbnailApi::new(&format!("{}/upload", server.uri()), 5).unwrap();
        let url = api.upload(&source()).await.unwrap();
        assert_eq!(url, "https://thumbs/cover.png");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on port 9 locally
        let api = HttpThumbnailApi::new("http://127.0.0.1:9/upload", 2).unwrap();
        match api.upload(&source()).await {
            Err(ClientError::ThumbnailUpload(msg)) => assert_eq!(msg, THUMBNAIL_SERVICE_DOWN),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
