/// Publish form state and its single merge operation
use crate::claims::{Claim, Fee};
use crate::error::{ClientResult, ResolveError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Visibility of published content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
    Scheduled,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Unlisted => "unlisted",
            Visibility::Scheduled => "scheduled",
        }
    }
}

impl FromStr for Visibility {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "unlisted" => Ok(Visibility::Unlisted),
            "scheduled" => Ok(Visibility::Scheduled),
            other => Err(ResolveError::UnhandledVisibility(other.to_string())),
        }
    }
}

impl TryFrom<String> for Visibility {
    type Error = ResolveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Payment gating mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Paywall {
    #[default]
    Free,
    /// One-time fee paid through the SDK in credits
    Sdk,
    /// Fiat purchase and/or rental
    Fiat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStatus {
    #[default]
    Ready,
    InProgress,
    Complete,
    Manual,
}

/// What to do with a livestream replay when editing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplaySource {
    #[default]
    Keep,
    Upload,
    Choose,
}

/// Rental duration as entered (value in `unit`s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalExpiration {
    pub value: f64,
    pub unit: String,
}

pub const LICENSE_NONE: &str = "None";
pub const LICENSE_PUBLIC_DOMAIN: &str = "Public Domain";
pub const LICENSE_COPYRIGHT: &str = "copyright";
pub const LICENSE_OTHER: &str = "other";

pub const CC_LICENSES: &[&str] = &[
    "Creative Commons Attribution 4.0 International",
    "Creative Commons Attribution-ShareAlike 4.0 International",
    "Creative Commons Attribution-NoDerivatives 4.0 International",
    "Creative Commons Attribution-NonCommercial 4.0 International",
    "Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International",
    "Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International",
];

/// A pending publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishFormState {
    pub name: String,
    pub title: String,
    pub description: String,
    pub author: Option<String>,
    pub language: String,
    pub languages: Vec<String>,
    /// Credits staked on the claim
    pub bid: f64,
    pub thumbnail: String,
    pub thumbnail_path: String,
    pub thumbnail_error: Option<String>,
    pub upload_thumbnail_status: ThumbnailStatus,
    pub file_path: Option<String>,
    pub remote_file_url: Option<String>,
    pub license_type: Option<String>,
    pub license_url: Option<String>,
    pub other_license_description: Option<String>,
    /// Channel name to publish under
    pub channel: Option<String>,
    pub tags: Vec<String>,
    pub nsfw: bool,
    pub optimize: bool,
    pub use_uploader: bool,
    pub visibility: Visibility,
    pub scheduled_show: bool,
    pub release_time: Option<i64>,
    pub is_livestream_publish: bool,
    pub replay_source: ReplaySource,
    pub editing_uri: Option<String>,
    pub claim_to_edit: Option<Box<Claim>>,
    pub stream_type: Option<String>,
    pub publishing: bool,
    pub publish_success: bool,
    pub paywall: Paywall,
    /// SDK fee, only used with `Paywall::Sdk`
    pub fee: Fee,
    pub fiat_purchase_enabled: bool,
    pub fiat_purchase_fee: Fee,
    pub fiat_rental_enabled: bool,
    pub fiat_rental_fee: Fee,
    pub fiat_rental_expiration: RentalExpiration,
    /// Comma-separated membership ids. `Some("")` clears restrictions.
    pub restricted_to_memberships: Option<String>,
}

impl Default for PublishFormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            description: String::new(),
            author: None,
            language: "en".to_string(),
            languages: Vec::new(),
            bid: 0.01,
            thumbnail: String::new(),
            thumbnail_path: String::new(),
            thumbnail_error: None,
            upload_thumbnail_status: ThumbnailStatus::Ready,
            file_path: None,
            remote_file_url: None,
            license_type: Some(LICENSE_NONE.to_string()),
            license_url: None,
            other_license_description: None,
            channel: None,
            tags: Vec::new(),
            nsfw: false,
            optimize: false,
            use_uploader: false,
            visibility: Visibility::Public,
            scheduled_show: false,
            release_time: None,
            is_livestream_publish: false,
            replay_source: ReplaySource::Keep,
            editing_uri: None,
            claim_to_edit: None,
            stream_type: None,
            publishing: false,
            publish_success: false,
            paywall: Paywall::Free,
            fee: Fee::new(1.0, "LBC"),
            fiat_purchase_enabled: false,
            fiat_purchase_fee: Fee::new(1.0, "USD"),
            fiat_rental_enabled: false,
            fiat_rental_fee: Fee::new(1.0, "USD"),
            fiat_rental_expiration: RentalExpiration {
                value: 1.0,
                unit: "weeks".to_string(),
            },
            restricted_to_memberships: None,
        }
    }
}

/// Partial form; `None` leaves the field untouched.
///
/// Nullable fields use a nested `Option` so an update can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishFormUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub bid: Option<f64>,
    pub thumbnail: Option<String>,
    pub thumbnail_path: Option<String>,
    pub thumbnail_error: Option<Option<String>>,
    pub upload_thumbnail_status: Option<ThumbnailStatus>,
    pub file_path: Option<Option<String>>,
    pub remote_file_url: Option<Option<String>>,
    pub license_type: Option<Option<String>>,
    pub license_url: Option<Option<String>>,
    pub other_license_description: Option<Option<String>>,
    pub channel: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub nsfw: Option<bool>,
    pub optimize: Option<bool>,
    pub use_uploader: Option<bool>,
    pub visibility: Option<Visibility>,
    pub scheduled_show: Option<bool>,
    pub release_time: Option<Option<i64>>,
    pub is_livestream_publish: Option<bool>,
    pub replay_source: Option<ReplaySource>,
    pub editing_uri: Option<Option<String>>,
    pub paywall: Option<Paywall>,
    pub fee: Option<Fee>,
    pub fiat_purchase_enabled: Option<bool>,
    pub fiat_purchase_fee: Option<Fee>,
    pub fiat_rental_enabled: Option<bool>,
    pub fiat_rental_fee: Option<Fee>,
    pub fiat_rental_expiration: Option<RentalExpiration>,
    pub restricted_to_memberships: Option<Option<String>>,
}

macro_rules! merge_fields {
    ($target:expr, $update:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $update.$field {
                $target.$field = value;
            }
        )+
    };
}

impl PublishFormState {
    /// Merge a partial update into the form
    pub fn apply(&mut self, update: PublishFormUpdate) {
        merge_fields!(
            self,
            update,
            name,
            title,
            description,
            language,
            bid,
            thumbnail,
            thumbnail_path,
            thumbnail_error,
            upload_thumbnail_status,
            file_path,
            remote_file_url,
            license_type,
            license_url,
            other_license_description,
            channel,
            tags,
            nsfw,
            optimize,
            use_uploader,
            visibility,
            scheduled_show,
            release_time,
            is_livestream_publish,
            replay_source,
            editing_uri,
            paywall,
            fee,
            fiat_purchase_enabled,
            fiat_purchase_fee,
            fiat_rental_enabled,
            fiat_rental_fee,
            fiat_rental_expiration,
            restricted_to_memberships,
        );
    }

    /// Restrictions are set, including the explicit "clear" value
    pub fn has_restriction_update(&self) -> bool {
        self.restricted_to_memberships.is_some()
    }

    /// At least one membership id is listed
    pub fn has_membership_restrictions(&self) -> bool {
        self.restricted_to_memberships
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// Load a form from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if let Some(visibility) = value.get("visibility").and_then(|v| v.as_str()) {
            visibility.parse::<Visibility>()?;
        }
        Ok(serde_json::from_value(value)?)
    }
}
