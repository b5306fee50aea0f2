/// Unified error types for the claim publisher
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suffix the SDK appends to messages when a call times out on its side
pub const SDK_FETCH_TIMEOUT: &str = "SDK_FETCH_TIMEOUT";

/// Shown instead of an SDK timeout, since the publish usually lands anyway
pub const PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL: &str =
    "The publish request timed out, but it was likely successful. Check your uploads page in a few minutes.";

/// Shown when a timed-out publish also carried membership restrictions
pub const RESTRICTED_CONTENT_PUBLISHING_FAILED: &str =
    "The publish request timed out and the membership restrictions may not have been saved. Please edit the content to confirm its restrictions.";

/// Default message when the thumbnail service rejects an upload
pub const THUMBNAIL_UPLOAD_REJECTED: &str =
    "There was an error in the upload. The format or extension might not be supported.";

/// Message for a thumbnail service that could not be reached
pub const THUMBNAIL_SERVICE_DOWN: &str = "Thumbnail upload service may be down, try again later.";

/// Main error type for the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Remote API returned an error payload
    #[error("API error: {0}")]
    Api(String),

    /// Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors caught before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Thumbnail upload failures
    #[error("Thumbnail upload failed: {0}")]
    ThumbnailUpload(String),

    /// Publish failures, already remapped to user-facing text
    #[error("Publish failed: {0}")]
    Publish(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Release time or tag resolution violated a precondition
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Precondition violations in the publish resolver.
///
/// These point at an upstream validation gap, never at user input, so they
/// are not mapped to friendly text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("New scheduled publish cannot have undefined release time")]
    MissingScheduledReleaseTime,

    #[error("unhandled visibility: \"{0}\"")]
    UnhandledVisibility(String),
}

/// Error notification surfaced to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ClientError {
    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(msg)
            | ClientError::Validation(msg)
            | ClientError::ThumbnailUpload(msg)
            | ClientError::Publish(msg) => msg.clone(),
            ClientError::Http(e) if e.is_connect() || e.is_timeout() => {
                "Could not reach the server, try again later.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Rewrite a raw publish failure into the message shown to the user
pub fn publish_failure_message(raw: &str, has_membership_restrictions: bool) -> String {
    let mut message = raw.to_string();

    if message.ends_with(SDK_FETCH_TIMEOUT) {
        message = PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL.to_string();
    }

    if has_membership_restrictions && message == PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL {
        message = RESTRICTED_CONTENT_PUBLISHING_FAILED.to_string();
    }

    message
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
