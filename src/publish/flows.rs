/// Publish flows: form updates, thumbnail upload, edit preparation and the
/// publish call itself
use super::edit::prepare_edit;
use super::form::{PublishFormState, PublishFormUpdate, ThumbnailStatus};
use super::payload::{resolve_publish_payload, PublishPayload};
use super::reducer::{UploadItem, UploadStatus};
use super::tags::MEMBERS_ONLY_CONTENT_TAG;
use crate::api::{PublishResponse, RestrictionUpdate, ThumbnailSource};
use crate::claims::{my_channel_claims, my_claim_for_editing_uri, Claim};
use crate::context::AppContext;
use crate::error::{publish_failure_message, ClientError, ClientResult, ErrorNotice};
use crate::jobs::ReflectorWatcher;
use crate::memberships::protected_content_memberships_for_claim;
use crate::store::Action;
use chrono::Utc;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Result of a publish call
#[derive(Debug)]
pub enum PublishOutcome {
    /// The SDK accepted the claim
    Published {
        claim: Claim,
        /// The claim id was already one of mine
        is_edit: bool,
        /// Reflector polling started for this publish, if any
        reflector: Option<JoinHandle<()>>,
    },
    /// Dry run; nothing was broadcast
    Preview(PublishResponse),
}

pub async fn do_update_publish_form(ctx: &AppContext, update: PublishFormUpdate) {
    ctx.store.dispatch(Action::UpdatePublishForm(update)).await;
}

pub async fn do_reset_thumbnail_status(ctx: &AppContext) {
    ctx.store
        .dispatch_batch(vec![
            Action::UpdatePublishForm(PublishFormUpdate {
                thumbnail_path: Some(String::new()),
                thumbnail_error: Some(None),
                ..PublishFormUpdate::default()
            }),
            Action::UpdatePublishForm(PublishFormUpdate {
                upload_thumbnail_status: Some(ThumbnailStatus::Ready),
                thumbnail: Some(String::new()),
                ..PublishFormUpdate::default()
            }),
        ])
        .await;
}

pub async fn do_clear_publish(ctx: &AppContext) {
    ctx.store.dispatch(Action::ClearPublish).await;
    do_reset_thumbnail_status(ctx).await;
}

/// Reset the thumbnail fields and surface the error
async fn thumbnail_upload_failed(ctx: &AppContext, message: String, cause: Option<String>) {
    ctx.store
        .dispatch_batch(vec![
            Action::UpdatePublishForm(PublishFormUpdate {
                upload_thumbnail_status: Some(ThumbnailStatus::Ready),
                thumbnail: Some(String::new()),
                nsfw: Some(false),
                ..PublishFormUpdate::default()
            }),
            Action::Error(ErrorNotice { message, cause }),
        ])
        .await;
}

/// Upload a thumbnail image and store its URL in the form
pub async fn do_upload_thumbnail(
    ctx: &AppContext,
    source: ThumbnailSource,
) -> ClientResult<String> {
    ctx.store
        .dispatch_batch(vec![
            Action::UpdatePublishForm(PublishFormUpdate {
                thumbnail_error: Some(None),
                ..PublishFormUpdate::default()
            }),
            Action::UpdatePublishForm(PublishFormUpdate {
                upload_thumbnail_status: Some(ThumbnailStatus::InProgress),
                ..PublishFormUpdate::default()
            }),
        ])
        .await;

    let limit = ctx.config.thumbnail.size_limit_bytes;
    if source.size() >= limit {
        let max_size_mb = limit as f64 / (1024.0 * 1024.0);
        let message = format!(
            "Thumbnail size over {}MB, please edit and reupload.",
            max_size_mb
        );
        thumbnail_upload_failed(ctx, message.clone(), None).await;
        return Err(ClientError::Validation(message));
    }

    match ctx.thumbnails.upload(&source).await {
        Ok(url) => {
            info!("Thumbnail uploaded: {}", url);
            ctx.store
                .dispatch(Action::UpdatePublishForm(PublishFormUpdate {
                    upload_thumbnail_status: Some(ThumbnailStatus::Complete),
                    thumbnail: Some(url.clone()),
                    ..PublishFormUpdate::default()
                }))
                .await;
            Ok(url)
        }
        Err(e) => {
            warn!("Thumbnail upload failed: {}", e);
            let cause = format!(
                "{} | {} | {}",
                source.file_name,
                source.mime_type,
                source.size()
            );
            thumbnail_upload_failed(ctx, e.user_message(), Some(cause)).await;
            Err(e)
        }
    }
}

/// Read an image from disk and upload it as the thumbnail
pub async fn do_upload_thumbnail_from_path(
    ctx: &AppContext,
    path: impl AsRef<Path>,
) -> ClientResult<String> {
    ctx.store
        .dispatch(Action::UpdatePublishForm(PublishFormUpdate {
            thumbnail_path: Some(path.as_ref().to_string_lossy().into_owned()),
            ..PublishFormUpdate::default()
        }))
        .await;
    let source = ThumbnailSource::from_path(path).await?;
    do_upload_thumbnail(ctx, source).await
}

/// Load `claim` into the publish form for editing.
///
/// Members-only claims need their protected membership ids; they are
/// fetched first when not already known.
pub async fn do_prepare_edit(ctx: &AppContext, claim: &Claim, uri: &str) {
    let channel_id = claim
        .signing_channel
        .as_deref()
        .map(|c| c.claim_id.clone())
        .filter(|id| !id.is_empty());

    let mut protected = None;
    if let Some(channel_id) = channel_id.as_deref() {
        if claim.has_tag(MEMBERS_ONLY_CONTENT_TAG) {
            protected = ctx
                .store
                .select(|s| {
                    protected_content_memberships_for_claim(s, channel_id, &claim.claim_id)
                        .map(<[String]>::to_vec)
                })
                .await;

            if protected.is_none() {
                match ctx.memberships.protected_content(&claim.claim_id).await {
                    Ok(ids) => {
                        ctx.store
                            .dispatch(Action::ProtectedContentFetched {
                                channel_id: channel_id.to_string(),
                                claim_id: claim.claim_id.clone(),
                                membership_ids: ids.clone(),
                            })
                            .await;
                        protected = Some(ids);
                    }
                    Err(e) => warn!(
                        "Could not fetch memberships protecting {}: {}",
                        claim.claim_id, e
                    ),
                }
            }
        }
    }

    let form = prepare_edit(claim, uri, protected.as_deref());
    debug!("Prepared edit for {} ({} tags)", uri, form.tags.len());
    ctx.store.dispatch(Action::PrepareEdit(Box::new(form))).await;
}

/// Save the form's membership restrictions for its content
async fn save_restrictions(
    ctx: &AppContext,
    channel_claim_id: &str,
    content_claim_id: Option<String>,
    form: &PublishFormState,
    is_new_content: Option<bool>,
) -> ClientResult<()> {
    let update = RestrictionUpdate {
        channel_claim_id: channel_claim_id.to_string(),
        content_claim_id,
        content_name: form.name.clone(),
        membership_ids: form.restricted_to_memberships.clone().unwrap_or_default(),
        is_new_content,
    };
    ctx.memberships.save_restrictions(&update).await
}

/// Work shared by a fresh publish and a resumed one after the SDK accepted it
async fn finish_publish(
    ctx: &AppContext,
    response: PublishResponse,
    form: &PublishFormState,
    upload_guid: Option<String>,
    track_reflecting: bool,
) -> ClientResult<PublishOutcome> {
    let claim = response
        .outputs
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Api("Publish returned no outputs".to_string()))?;

    let is_edit = ctx
        .store
        .select(|s| s.claims.my_claim_ids.contains(&claim.claim_id))
        .await;

    let mut actions = vec![
        Action::PublishSuccess {
            claim_type: claim.claim_type_label(),
        },
        Action::UpdatePendingClaims {
            claims: vec![claim.clone()],
        },
    ];
    if track_reflecting {
        actions.push(Action::AddFilesReflecting {
            claim: claim.clone(),
        });
    }
    if let Some(guid) = upload_guid {
        actions.push(Action::UpdateUploadRemove { guid });
    }
    ctx.store.dispatch_batch(actions).await;

    info!(
        "Published {} ({}){}",
        claim.name,
        claim.claim_id,
        if is_edit { " as an edit" } else { "" }
    );

    // Overwrite the pre-publish save now that the claim id is known
    if let Some(channel_id) = claim.channel_id() {
        if form.has_restriction_update() {
            if let Err(e) = save_restrictions(
                ctx,
                channel_id,
                Some(claim.claim_id.clone()),
                form,
                None,
            )
            .await
            {
                warn!(
                    "Failed to save membership restrictions for {}: {}",
                    claim.claim_id, e
                );
            }
        }
    }

    let reflector = if track_reflecting {
        ReflectorWatcher::new(ctx.clone()).start().await
    } else {
        None
    };

    Ok(PublishOutcome::Published {
        claim,
        is_edit,
        reflector,
    })
}

/// Record a failed publish and return the user-facing error
async fn fail_publish(
    ctx: &AppContext,
    message: String,
    upload_guid: Option<String>,
) -> ClientError {
    error!("Publish failed: {}", message);
    let mut actions = vec![
        Action::PublishFail,
        Action::Error(ErrorNotice {
            message: message.clone(),
            cause: None,
        }),
    ];
    if let Some(guid) = upload_guid {
        actions.push(Action::UpdateUploadProgress {
            guid,
            progress: None,
            status: Some(UploadStatus::Error),
        });
    }
    ctx.store.dispatch_batch(actions).await;
    ClientError::Publish(message)
}

/// Save the form's restrictions before the SDK call so they exist even if
/// the publish times out. A successful publish saves them again with the
/// real claim id.
async fn save_restrictions_before_publish(
    ctx: &AppContext,
    payload: &PublishPayload,
    form: &PublishFormState,
    existing_claim_id: Option<String>,
) {
    let Some(channel_id) = payload.channel_id.as_deref() else {
        return;
    };
    if !form.has_restriction_update() {
        return;
    }

    let is_new_content = existing_claim_id.is_none().then_some(true);
    if let Err(e) =
        save_restrictions(ctx, channel_id, existing_claim_id, form, is_new_content).await
    {
        warn!("Failed to save membership restrictions before publish: {}", e);
    }
}

/// Publish the current form.
///
/// With `preview` the SDK only validates the payload and nothing is
/// broadcast or recorded.
pub async fn do_publish(ctx: &AppContext, preview: bool) -> ClientResult<PublishOutcome> {
    if !preview {
        ctx.store.dispatch(Action::PublishStart).await;
    }

    let now = Utc::now().timestamp();
    let (form, resolved, existing_claim_id) = ctx
        .store
        .select(|s| {
            let form = s.publish.form.clone();
            let my_claim = my_claim_for_editing_uri(s);
            let channels = my_channel_claims(s);
            let resolved = resolve_publish_payload(&form, my_claim, &channels, now, preview);
            (form, resolved, my_claim.map(|c| c.claim_id.clone()))
        })
        .await;

    let payload = match resolved {
        Ok(payload) => payload,
        Err(e) => {
            error!("Publish payload could not be resolved: {}", e);
            if !preview {
                ctx.store.dispatch(Action::PublishFail).await;
            }
            return Err(e.into());
        }
    };

    if preview {
        return match ctx.sdk.publish(&payload).await {
            Ok(response) => Ok(PublishOutcome::Preview(response)),
            Err(e) => {
                let message =
                    publish_failure_message(&e.user_message(), form.has_membership_restrictions());
                Err(fail_publish(ctx, message, None).await)
            }
        };
    }

    save_restrictions_before_publish(ctx, &payload, &form, existing_claim_id).await;

    let upload_guid = if payload.file_path.is_some() {
        let guid = Uuid::new_v4().to_string();
        ctx.store
            .dispatch(Action::UpdateUploadAdd {
                item: UploadItem {
                    guid: guid.clone(),
                    params: payload.clone(),
                    progress: 0.0,
                    status: UploadStatus::Uploading,
                },
            })
            .await;
        Some(guid)
    } else {
        None
    };

    match ctx.sdk.publish(&payload).await {
        Ok(response) => finish_publish(ctx, response, &form, upload_guid, true).await,
        Err(e) => {
            let message =
                publish_failure_message(&e.user_message(), form.has_membership_restrictions());
            Err(fail_publish(ctx, message, upload_guid).await)
        }
    }
}

/// Retry a stored upload with the payload it was first sent with
pub async fn do_publish_resume(
    ctx: &AppContext,
    upload: &UploadItem,
) -> ClientResult<PublishOutcome> {
    info!("Resuming upload {}", upload.guid);
    ctx.store
        .dispatch_batch(vec![
            Action::PublishStart,
            Action::UpdateUploadProgress {
                guid: upload.guid.clone(),
                progress: None,
                status: Some(UploadStatus::Uploading),
            },
        ])
        .await;

    let form = ctx.store.select(|s| s.publish.form.clone()).await;
    resume_with_payload(ctx, &upload.params, &form, upload.guid.clone()).await
}

async fn resume_with_payload(
    ctx: &AppContext,
    payload: &PublishPayload,
    form: &PublishFormState,
    guid: String,
) -> ClientResult<PublishOutcome> {
    save_restrictions_before_publish(ctx, payload, form, payload.claim_id.clone()).await;

    match ctx.sdk.publish(payload).await {
        Ok(response) => finish_publish(ctx, response, form, Some(guid), false).await,
        Err(e) => Err(fail_publish(ctx, e.user_message(), Some(guid)).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{MockMemberships, MockSdk, MockThumbnails, Mocks};
    use crate::claims::ClaimValue;
    use crate::error::{
        PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL, RESTRICTED_CONTENT_PUBLISHING_FAILED,
        SDK_FETCH_TIMEOUT, THUMBNAIL_SERVICE_DOWN,
    };
    use crate::publish::form::Visibility;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn channel() -> Claim {
        Claim {
            claim_id: "chan".to_string(),
            name: "@chan".to_string(),
            value_type: Some("channel".to_string()),
            is_my_output: true,
            ..Claim::default()
        }
    }

    fn published_claim() -> Claim {
        Claim {
            claim_id: "new-claim".to_string(),
            name: "clip".to_string(),
            permanent_url: Some("lbry://clip#new-claim".to_string()),
            value_type: Some("stream".to_string()),
            signing_channel: Some(Box::new(channel())),
            value: ClaimValue {
                source: Some(serde_json::json!({ "sd_hash": "abc" })),
                stream_type: Some("video".to_string()),
                ..ClaimValue::default()
            },
            ..Claim::default()
        }
    }

    fn sdk_ok() -> MockSdk {
        MockSdk {
            outputs: vec![published_claim()],
            ..MockSdk::default()
        }
    }

    async fn fill_form(ctx: &AppContext, restricted: Option<&str>) {
        ctx.store
            .dispatch_batch(vec![
                Action::SetMyClaims {
                    claims: vec![],
                    channels: vec![channel()],
                },
                Action::UpdatePublishForm(PublishFormUpdate {
                    name: Some("clip".to_string()),
                    title: Some("Clip".to_string()),
                    channel: Some(Some("@chan".to_string())),
                    restricted_to_memberships: Some(restricted.map(str::to_string)),
                    ..PublishFormUpdate::default()
                }),
            ])
            .await;
    }

    #[tokio::test]
    async fn test_publish_success_updates_state() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, None).await;

        let outcome = do_publish(&ctx, false).await.unwrap();
        let PublishOutcome::Published {
            claim,
            is_edit,
            reflector,
        } = outcome
        else {
            panic!("expected a published outcome");
        };
        assert_eq!(claim.claim_id, "new-claim");
        assert!(!is_edit);
        // No file was attached, so the reflector watch ends on its first pass
        if let Some(handle) = reflector {
            handle.await.unwrap();
        }

        let state = ctx.store.snapshot().await;
        assert!(state.publish.form.publish_success);
        assert!(!state.publish.form.publishing);
        assert_eq!(state.publish.last_published_type.as_deref(), Some("video"));
        assert!(state.claims.pending_by_id.contains_key("new-claim"));
        assert!(mocks.memberships.saved.lock().unwrap().is_empty());

        let sent = mocks.sdk.published.lock().unwrap();
        assert_eq!(sent[0].channel_id.as_deref(), Some("chan"));
        assert_eq!(sent[0].bid, "0.01000000");
    }

    #[tokio::test]
    async fn test_restrictions_saved_before_and_after() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("1,2")).await;

        do_publish(&ctx, false).await.unwrap();

        let saved = mocks.memberships.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].content_claim_id, None);
        assert_eq!(saved[0].is_new_content, Some(true));
        assert_eq!(saved[0].membership_ids, "1,2");
        assert_eq!(saved[1].content_claim_id.as_deref(), Some("new-claim"));
        assert_eq!(saved[1].is_new_content, None);

        let tags = &mocks.sdk.published.lock().unwrap()[0].tags;
        assert!(tags.contains(&MEMBERS_ONLY_CONTENT_TAG.to_string()));
    }

    #[tokio::test]
    async fn test_empty_restrictions_still_saved() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("")).await;

        do_publish(&ctx, false).await.unwrap();
        let saved = mocks.memberships.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|u| u.membership_ids.is_empty()));
    }

    #[tokio::test]
    async fn test_secondary_save_failure_is_not_fatal() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            memberships: Arc::new(MockMemberships {
                fail_saves: true,
                ..MockMemberships::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("1")).await;

        assert!(do_publish(&ctx, false).await.is_ok());
        assert!(ctx.store.select(|s| s.errors.is_empty()).await);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_likely_success() {
        let mocks = Mocks {
            sdk: Arc::new(MockSdk {
                publish_error: Some(format!("publish timed out: {}", SDK_FETCH_TIMEOUT)),
                ..MockSdk::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, None).await;

        match do_publish(&ctx, false).await {
            Err(ClientError::Publish(msg)) => {
                assert_eq!(msg, PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL)
            }
            other => panic!("unexpected: {:?}", other),
        }
        let state = ctx.store.snapshot().await;
        assert!(!state.publish.form.publishing);
        assert_eq!(state.errors[0].message, PUBLISH_TIMEOUT_BUT_LIKELY_SUCCESSFUL);
    }

    #[tokio::test]
    async fn test_timeout_with_restrictions() {
        let mocks = Mocks {
            sdk: Arc::new(MockSdk {
                publish_error: Some(SDK_FETCH_TIMEOUT.to_string()),
                ..MockSdk::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("4")).await;

        let err = do_publish(&ctx, false).await.unwrap_err();
        assert_eq!(err.user_message(), RESTRICTED_CONTENT_PUBLISHING_FAILED);
    }

    #[tokio::test]
    async fn test_failed_file_upload_is_resumable() {
        let mocks = Mocks {
            sdk: Arc::new(MockSdk {
                publish_error: Some("connection reset".to_string()),
                ..MockSdk::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, None).await;
        do_update_publish_form(
            &ctx,
            PublishFormUpdate {
                file_path: Some(Some("/tmp/clip.mp4".to_string())),
                ..PublishFormUpdate::default()
            },
        )
        .await;

        assert!(do_publish(&ctx, false).await.is_err());
        let state = ctx.store.snapshot().await;
        let resumable = state.publish.resumable_uploads();
        assert_eq!(resumable.len(), 1);
        assert_eq!(resumable[0].params.file_path.as_deref(), Some("/tmp/clip.mp4"));
    }

    #[tokio::test]
    async fn test_resume_publishes_stored_payload() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        let form = PublishFormState {
            name: "clip".to_string(),
            file_path: Some("/tmp/clip.mp4".to_string()),
            ..PublishFormState::default()
        };
        let item = UploadItem {
            guid: "g1".to_string(),
            params: resolve_publish_payload(&form, None, &[], 1_700_000_000, false).unwrap(),
            progress: 40.0,
            status: UploadStatus::Error,
        };
        ctx.store
            .dispatch(Action::UpdateUploadAdd { item: item.clone() })
            .await;

        let outcome = do_publish_resume(&ctx, &item).await.unwrap();
        assert!(matches!(
            outcome,
            PublishOutcome::Published { reflector: None, .. }
        ));

        let state = ctx.store.snapshot().await;
        assert!(state.publish.uploads.is_empty());
        assert!(state.claims.reflecting_by_id.is_empty());
        assert_eq!(mocks.sdk.published.lock().unwrap()[0], item.params);
    }

    #[tokio::test]
    async fn test_resume_saves_restrictions_first() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("5")).await;

        let form = ctx.store.select(|s| s.publish.form.clone()).await;
        let chan = channel();
        let item = UploadItem {
            guid: "g2".to_string(),
            params: resolve_publish_payload(&form, None, &[&chan], 1_700_000_000, false).unwrap(),
            progress: 0.0,
            status: UploadStatus::Error,
        };

        do_publish_resume(&ctx, &item).await.unwrap();

        let saved = mocks.memberships.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].channel_claim_id, "chan");
        assert_eq!(saved[0].content_claim_id, None);
        assert_eq!(saved[0].is_new_content, Some(true));
        assert_eq!(saved[0].membership_ids, "5");
        assert_eq!(saved[1].content_claim_id.as_deref(), Some("new-claim"));
    }

    #[tokio::test]
    async fn test_preview_leaves_state_alone() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, Some("1")).await;

        let outcome = do_publish(&ctx, true).await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Preview(_)));

        let state = ctx.store.snapshot().await;
        assert!(!state.publish.form.publish_success);
        assert!(state.claims.pending_by_id.is_empty());
        assert!(mocks.memberships.saved.lock().unwrap().is_empty());

        let sent = mocks.sdk.published.lock().unwrap();
        assert!(sent[0].preview);
        assert_eq!(sent[0].optimize_file, Some(false));
    }

    #[tokio::test]
    async fn test_scheduled_without_time_fails_to_resolve() {
        let mocks = Mocks {
            sdk: Arc::new(sdk_ok()),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        fill_form(&ctx, None).await;
        do_update_publish_form(
            &ctx,
            PublishFormUpdate {
                visibility: Some(Visibility::Scheduled),
                release_time: Some(None),
                ..PublishFormUpdate::default()
            },
        )
        .await;

        let err = do_publish(&ctx, false).await.unwrap_err();
        assert!(matches!(err, ClientError::Resolve(_)));
        assert!(!ctx.store.select(|s| s.publish.form.publishing).await);
        assert!(mocks.sdk.published.lock().unwrap().is_empty());
    }

    fn thumbnail(size: usize) -> ThumbnailSource {
        ThumbnailSource {
            file_name: "cover.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[tokio::test]
    async fn test_thumbnail_upload_success() {
        let mocks = Mocks::default();
        let ctx = mocks.context();

        let url = do_upload_thumbnail(&ctx, thumbnail(16)).await.unwrap();
        let form = ctx.store.select(|s| s.publish.form.clone()).await;
        assert_eq!(form.thumbnail, url);
        assert_eq!(form.upload_thumbnail_status, ThumbnailStatus::Complete);
    }

    #[tokio::test]
    async fn test_oversized_thumbnail_rejected_locally() {
        let mocks = Mocks::default();
        let ctx = mocks.context();
        let limit = ctx.config.thumbnail.size_limit_bytes as usize;

        let err = do_upload_thumbnail(&ctx, thumbnail(limit)).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Thumbnail size over 2MB, please edit and reupload."
        );
        assert_eq!(
            mocks
                .thumbnails
                .uploads
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
        let form = ctx.store.select(|s| s.publish.form.clone()).await;
        assert_eq!(form.upload_thumbnail_status, ThumbnailStatus::Ready);
    }

    #[tokio::test]
    async fn test_thumbnail_failure_resets_form() {
        let mocks = Mocks {
            thumbnails: Arc::new(MockThumbnails {
                result: Err(THUMBNAIL_SERVICE_DOWN.to_string()),
                ..MockThumbnails::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        do_update_publish_form(
            &ctx,
            PublishFormUpdate {
                nsfw: Some(true),
                thumbnail: Some("old".to_string()),
                ..PublishFormUpdate::default()
            },
        )
        .await;

        assert!(do_upload_thumbnail(&ctx, thumbnail(8)).await.is_err());
        let state = ctx.store.snapshot().await;
        assert_eq!(state.publish.form.thumbnail, "");
        assert!(!state.publish.form.nsfw);
        assert_eq!(state.errors[0].message, THUMBNAIL_SERVICE_DOWN);
        assert_eq!(
            state.errors[0].cause.as_deref(),
            Some("cover.png | image/png | 8")
        );
    }

    #[tokio::test]
    async fn test_clear_publish_resets_thumbnail() {
        let ctx = Mocks::default().context();
        do_update_publish_form(
            &ctx,
            PublishFormUpdate {
                name: Some("clip".to_string()),
                thumbnail: Some("https://x".to_string()),
                upload_thumbnail_status: Some(ThumbnailStatus::Complete),
                ..PublishFormUpdate::default()
            },
        )
        .await;

        do_clear_publish(&ctx).await;
        let form = ctx.store.select(|s| s.publish.form.clone()).await;
        assert_eq!(form.name, "");
        assert_eq!(form.thumbnail, "");
        assert_eq!(form.upload_thumbnail_status, ThumbnailStatus::Ready);
    }

    #[tokio::test]
    async fn test_prepare_edit_fetches_protected_memberships_once() {
        let mocks = Mocks {
            memberships: Arc::new(MockMemberships {
                protected: HashMap::from([(
                    "new-claim".to_string(),
                    vec!["3".to_string(), "5".to_string()],
                )]),
                ..MockMemberships::default()
            }),
            ..Mocks::default()
        };
        let ctx = mocks.context();
        let mut claim = published_claim();
        claim.value.tags = vec![MEMBERS_ONLY_CONTENT_TAG.to_string()];

        do_prepare_edit(&ctx, &claim, "lbry://clip#new-claim").await;
        do_prepare_edit(&ctx, &claim, "lbry://clip#new-claim").await;

        let form = ctx.store.select(|s| s.publish.form.clone()).await;
        assert_eq!(form.restricted_to_memberships.as_deref(), Some("3,5"));
        assert_eq!(form.editing_uri.as_deref(), Some("lbry://clip#new-claim"));
        assert_eq!(
            mocks
                .memberships
                .lookups
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }
}
