/// Recover a publish form from an existing claim
use super::form::{
    Paywall, PublishFormState, RentalExpiration, ThumbnailStatus, Visibility, CC_LICENSES,
    LICENSE_COPYRIGHT, LICENSE_NONE, LICENSE_OTHER, LICENSE_PUBLIC_DOMAIN,
};
use super::tags::{
    parse_purchase_tag, parse_rental_tag, unit_to_seconds, MEMBERS_ONLY_CONTENT_TAG, PRIVATE_TAG,
    SCHEDULED_HIDE_TAG, SCHEDULED_SHOW_TAG, UNLISTED_TAG, UPLOADER_ATTRIBUTION_TAG,
};
use crate::claims::{Claim, Fee};

/// Fiat prices are only offered in USD for now
const FIAT_CURRENCY: &str = "USD";

/// Map a claim's license onto the form's license fields
fn license_fields(
    license: Option<&str>,
    license_url: Option<&str>,
) -> (Option<String>, Option<String>) {
    let license = license.filter(|l| !l.is_empty());

    if let Some(l) = license {
        if CC_LICENSES.contains(&l) {
            return (Some(l.to_string()), None);
        }
    }

    let license_type = match license {
        None => None,
        Some(l) if l == LICENSE_NONE || l == LICENSE_PUBLIC_DOMAIN => Some(l.to_string()),
        Some(_) if license_url.map(|u| u.is_empty()).unwrap_or(true) => {
            Some(LICENSE_COPYRIGHT.to_string())
        }
        Some(_) => Some(LICENSE_OTHER.to_string()),
    };

    (license_type, license.map(str::to_string))
}

fn visibility_from_tags(tags: &[String]) -> (Visibility, bool) {
    let has = |tag: &str| tags.iter().any(|t| t == tag);

    if has(UNLISTED_TAG) {
        (Visibility::Unlisted, false)
    } else if has(PRIVATE_TAG) {
        (Visibility::Private, false)
    } else if has(SCHEDULED_HIDE_TAG) {
        (Visibility::Scheduled, false)
    } else if has(SCHEDULED_SHOW_TAG) {
        (Visibility::Scheduled, true)
    } else {
        (Visibility::Public, false)
    }
}

/// Build the form for editing `claim`.
///
/// `protected_memberships` are the membership ids currently guarding the
/// claim; the caller fetches them first when the claim is members-only.
pub fn prepare_edit(
    claim: &Claim,
    uri: &str,
    protected_memberships: Option<&[String]>,
) -> PublishFormState {
    let value = &claim.value;
    let channel = claim.signing_channel.as_deref();
    let fee = value.fee.clone().unwrap_or_else(|| Fee::new(0.0, "LBC"));

    let mut form = PublishFormState {
        name: claim.name.clone(),
        bid: claim.amount,
        author: value.author.clone(),
        description: value.description.clone().unwrap_or_default(),
        languages: value.languages.clone(),
        thumbnail: value
            .thumbnail
            .as_ref()
            .map(|t| t.url.clone())
            .unwrap_or_default(),
        upload_thumbnail_status: if value.thumbnail.is_some() {
            ThumbnailStatus::Manual
        } else {
            ThumbnailStatus::Ready
        },
        title: value.title.clone().unwrap_or_default(),
        license_url: value.license_url.clone(),
        nsfw: claim.is_nsfw(),
        tags: value.tags.clone(),
        stream_type: value.stream_type.clone(),
        editing_uri: Some(uri.to_string()),
        claim_to_edit: Some(Box::new(claim.clone())),
        channel: channel.map(|c| c.name.clone()),
        use_uploader: value.tags.iter().any(|t| t == UPLOADER_ATTRIBUTION_TAG),
        ..PublishFormState::default()
    };

    if let Some(language) = value.languages.first() {
        form.language = language.clone();
    }

    let (license_type, other_description) =
        license_fields(value.license.as_deref(), value.license_url.as_deref());
    form.license_type = license_type;
    form.other_license_description = other_description;

    let rental = parse_rental_tag(&value.tags);
    let purchase_price = parse_purchase_tag(&value.tags);

    form.paywall = if rental.is_some() || purchase_price.is_some() {
        Paywall::Fiat
    } else if fee.amount > 0.0 {
        Paywall::Sdk
    } else {
        Paywall::Free
    };
    form.fee = fee;

    if let Some(rental) = rental {
        let seconds_per_day = unit_to_seconds("days").unwrap_or(86_400) as f64;
        form.fiat_rental_enabled = true;
        form.fiat_rental_fee = Fee::new(rental.price, FIAT_CURRENCY);
        // The chosen unit is not stored, so always come back as days
        form.fiat_rental_expiration = RentalExpiration {
            value: rental.expiration_seconds as f64 / seconds_per_day,
            unit: "days".to_string(),
        };
    }

    if let Some(price) = purchase_price {
        form.fiat_purchase_enabled = true;
        form.fiat_purchase_fee = Fee::new(price, FIAT_CURRENCY);
    }

    if form.tags.iter().any(|t| t == MEMBERS_ONLY_CONTENT_TAG) {
        let has_channel = channel.map(|c| !c.claim_id.is_empty()).unwrap_or(false);
        if has_channel {
            form.restricted_to_memberships = protected_memberships.map(|ids| ids.join(","));
        } else {
            form.tags.retain(|t| t != MEMBERS_ONLY_CONTENT_TAG);
        }
    }

    let (visibility, scheduled_show) = visibility_from_tags(&value.tags);
    form.visibility = visibility;
    form.scheduled_show = scheduled_show;

    form
}
