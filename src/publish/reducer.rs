/// Publish state slice: the form plus in-flight uploads
use super::form::{PublishFormState, ThumbnailStatus};
use super::payload::PublishPayload;
use crate::store::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    /// Upload stopped with an error and can be resumed
    Error,
    /// Waiting to be resumed with the stored payload
    Retry,
}

/// A publish whose file upload is still in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadItem {
    pub guid: String,
    pub params: PublishPayload,
    pub progress: f64,
    pub status: UploadStatus,
}

#[derive(Debug, Clone, Default)]
pub struct PublishState {
    pub form: PublishFormState,
    pub uploads: HashMap<String, UploadItem>,
    /// Claim type reported by the last successful publish
    pub last_published_type: Option<String>,
}

impl PublishState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::UpdatePublishForm(update) => {
                self.form.apply(update.clone());
            }
            Action::ClearPublish => {
                self.form = PublishFormState::default();
            }
            Action::PublishStart => {
                self.form.publishing = true;
                self.form.publish_success = false;
            }
            Action::PublishSuccess { claim_type } => {
                // Keep the upload bookkeeping; everything else starts over
                self.form = PublishFormState {
                    publish_success: true,
                    ..PublishFormState::default()
                };
                self.last_published_type = Some(claim_type.clone());
            }
            Action::PublishFail => {
                self.form.publishing = false;
            }
            Action::PrepareEdit(form) => {
                self.form = PublishFormState {
                    upload_thumbnail_status: if form.thumbnail.is_empty() {
                        ThumbnailStatus::Ready
                    } else {
                        form.upload_thumbnail_status
                    },
                    ..(**form).clone()
                };
            }
            Action::UpdateUploadAdd { item } => {
                self.uploads.insert(item.guid.clone(), item.clone());
            }
            Action::UpdateUploadProgress {
                guid,
                progress,
                status,
            } => {
                if let Some(item) = self.uploads.get_mut(guid) {
                    if let Some(progress) = progress {
                        item.progress = *progress;
                    }
                    if let Some(status) = status {
                        item.status = *status;
                    }
                }
            }
            Action::UpdateUploadRemove { guid } => {
                self.uploads.remove(guid);
            }
            _ => {}
        }
    }

    /// Uploads that stopped and can be resumed
    pub fn resumable_uploads(&self) -> Vec<&UploadItem> {
        self.uploads
            .values()
            .filter(|u| matches!(u.status, UploadStatus::Error | UploadStatus::Retry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::form::{PublishFormUpdate, Visibility};
    use crate::publish::payload::resolve_publish_payload;

    fn upload(guid: &str) -> UploadItem {
        let form = PublishFormState {
            name: "clip".to_string(),
            ..PublishFormState::default()
        };
        UploadItem {
            guid: guid.to_string(),
            params: resolve_publish_payload(&form, None, &[], 1_700_000_000, false).unwrap(),
            progress: 0.0,
            status: UploadStatus::Uploading,
        }
    }

    #[test]
    fn test_update_then_clear() {
        let mut state = PublishState::default();
        state.apply(&Action::UpdatePublishForm(PublishFormUpdate {
            title: Some("Hello".to_string()),
            visibility: Some(Visibility::Private),
            ..PublishFormUpdate::default()
        }));
        assert_eq!(state.form.title, "Hello");
        assert_eq!(state.form.visibility, Visibility::Private);

        state.apply(&Action::ClearPublish);
        assert_eq!(state.form, PublishFormState::default());
    }

    #[test]
    fn test_publish_lifecycle() {
        let mut state = PublishState::default();
        state.apply(&Action::PublishStart);
        assert!(state.form.publishing);

        state.apply(&Action::PublishFail);
        assert!(!state.form.publishing);

        state.apply(&Action::PublishStart);
        state.apply(&Action::PublishSuccess {
            claim_type: "video".to_string(),
        });
        assert!(!state.form.publishing);
        assert!(state.form.publish_success);
        assert_eq!(state.last_published_type.as_deref(), Some("video"));
    }

    #[test]
    fn test_upload_tracking() {
        let mut state = PublishState::default();
        state.apply(&Action::UpdateUploadAdd { item: upload("g1") });
        state.apply(&Action::UpdateUploadProgress {
            guid: "g1".to_string(),
            progress: Some(42.0),
            status: None,
        });
        assert_eq!(state.uploads["g1"].progress, 42.0);
        assert!(state.resumable_uploads().is_empty());

        state.apply(&Action::UpdateUploadProgress {
            guid: "g1".to_string(),
            progress: None,
            status: Some(UploadStatus::Error),
        });
        assert_eq!(state.resumable_uploads().len(), 1);

        state.apply(&Action::UpdateUploadRemove {
            guid: "g1".to_string(),
        });
        assert!(state.uploads.is_empty());
    }

    #[test]
    fn test_progress_for_unknown_upload_is_ignored() {
        let mut state = PublishState::default();
        state.apply(&Action::UpdateUploadProgress {
            guid: "missing".to_string(),
            progress: Some(10.0),
            status: None,
        });
        assert!(state.uploads.is_empty());
    }
}
