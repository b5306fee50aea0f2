/// Publish payload sent to the SDK `publish` call
use super::form::{Paywall, PublishFormState, Visibility, LICENSE_COPYRIGHT, LICENSE_OTHER};
use super::release_time::resolve_release_time;
use super::tags::{reconcile_tags, TagSet};
use crate::claims::Claim;
use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Format a credit amount the way the SDK expects it
pub fn credits_to_string(amount: f64) -> String {
    format!("{:.8}", amount)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishPayload {
    pub name: String,
    pub title: String,
    pub description: String,
    pub locations: Vec<serde_json::Value>,
    pub bid: String,
    pub languages: Vec<String>,
    pub thumbnail_url: String,
    pub release_time: i64,
    pub blocking: bool,
    pub preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Set when updating an existing stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// Build the publish payload from the form.
///
/// `my_claim_for_uri` is my claim at the form's editing URI. It only counts
/// as an edit when its name matches the form name, since a channel can
/// share a name with the content being published.
pub fn resolve_publish_payload(
    form: &PublishFormState,
    my_claim_for_uri: Option<&Claim>,
    my_channels: &[&Claim],
    now: i64,
    preview: bool,
) -> Result<PublishPayload, ResolveError> {
    let editing = my_claim_for_uri.filter(|c| c.name == form.name);

    let license = match form.license_type.as_deref() {
        Some(LICENSE_COPYRIGHT) | Some(LICENSE_OTHER) => {
            non_empty(form.other_license_description.as_ref())
        }
        _ => non_empty(form.license_type.as_ref()),
    };

    let channel_id = form.channel.as_deref().and_then(|name| {
        my_channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.claim_id.clone())
    });

    let release_time = resolve_release_time(now, form.release_time, editing, form)?
        .filter(|t| *t != 0)
        .unwrap_or(now);

    let mut tag_set = TagSet::from_strings(&form.tags);
    reconcile_tags(
        &mut tag_set,
        form,
        Some(release_time),
        now,
        channel_id.as_deref(),
    );

    let locations = editing
        .map(|claim| claim.value.locations.clone())
        .unwrap_or_default();

    let (fee_currency, fee_amount) = if form.paywall == Paywall::Sdk
        && form.visibility == Visibility::Public
        && !form.fee.currency.is_empty()
        && form.fee.amount > 0.0
    {
        (
            Some(form.fee.currency.clone()),
            Some(credits_to_string(form.fee.amount)),
        )
    } else {
        (None, None)
    };

    // Metadata-only edits and livestreams carry no file
    let file_path = if form.is_livestream_publish {
        None
    } else {
        non_empty(form.file_path.as_ref())
    };

    let payload = PublishPayload {
        name: form.name.clone(),
        title: form.title.clone(),
        description: form.description.clone(),
        locations,
        bid: credits_to_string(form.bid),
        languages: vec![form.language.clone()],
        thumbnail_url: form.thumbnail.clone(),
        release_time,
        blocking: true,
        preview,
        remote_url: non_empty(form.remote_file_url.as_ref()),
        claim_id: my_claim_for_uri.map(|c| c.claim_id.clone()),
        optimize_file: if preview {
            Some(false)
        } else if form.optimize {
            Some(true)
        } else {
            None
        },
        channel_id,
        license_url: non_empty(form.license_url.as_ref()),
        license,
        tags: tag_set.to_strings(),
        fee_currency,
        fee_amount,
        file_path,
    };

    debug!(
        "Resolved publish payload for '{}' (release_time={}, tags={:?})",
        payload.name, payload.release_time, payload.tags
    );

    Ok(payload)
}
