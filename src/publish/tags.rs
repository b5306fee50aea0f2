/// Structured content tags and the publish tag reconciliation pass
///
/// Claims carry visibility, scheduling, paywall and membership state as
/// plain string tags. Internally those strings are parsed into
/// [`ContentTag`] so each reconciliation step can match on structure; the
/// string form only appears at the publish payload boundary.
use super::form::{Paywall, PublishFormState, Visibility};
use std::fmt;

pub const UPLOADER_ATTRIBUTION_TAG: &str = "lbry-first";
pub const SCHEDULED_LIVESTREAM_TAG: &str = "c:scheduled-livestream";
pub const MEMBERS_ONLY_CONTENT_TAG: &str = "c:members-only";
pub const PURCHASE_TAG: &str = "c:purchase";
pub const PURCHASE_TAG_OLD: &str = "purchase:";
pub const RENTAL_TAG: &str = "c:rental";
pub const RENTAL_TAG_OLD: &str = "rental:";
pub const PRIVATE_TAG: &str = "c:private";
pub const UNLISTED_TAG: &str = "c:unlisted";
pub const SCHEDULED_SHOW_TAG: &str = "c:scheduled:show";
pub const SCHEDULED_HIDE_TAG: &str = "c:scheduled:hide";

/// Unit used when a rental duration unit is not recognized
const FALLBACK_UNIT_SECONDS: i64 = 3600;

/// Seconds per rental duration unit
pub fn unit_to_seconds(unit: &str) -> Option<i64> {
    match unit {
        "minutes" => Some(60),
        "hours" => Some(3600),
        "days" => Some(86_400),
        "weeks" => Some(604_800),
        "months" => Some(2_592_000),
        "years" => Some(31_536_000),
        _ => None,
    }
}

/// Rental duration normalized to seconds
pub fn rental_seconds(value: f64, unit: &str) -> i64 {
    let per_unit = unit_to_seconds(unit).unwrap_or(FALLBACK_UNIT_SECONDS);
    (value * per_unit as f64).round() as i64
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// A tag classified by meaning
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentTag {
    Private,
    Unlisted,
    ScheduledShow,
    ScheduledHide,
    MembersOnly,
    ScheduledLivestream,
    UploaderAttribution,
    Purchase,
    PurchasePrice { cents: i64 },
    Rental,
    RentalTerms { cents: i64, seconds: i64 },
    /// Old-format or unparseable purchase tag, kept only to be stripped
    LegacyPurchase(String),
    /// Old-format or unparseable rental tag, kept only to be stripped
    LegacyRental(String),
    Other(String),
}

impl ContentTag {
    pub fn parse(raw: &str) -> Self {
        match raw {
            PRIVATE_TAG => return ContentTag::Private,
            UNLISTED_TAG => return ContentTag::Unlisted,
            SCHEDULED_SHOW_TAG => return ContentTag::ScheduledShow,
            SCHEDULED_HIDE_TAG => return ContentTag::ScheduledHide,
            MEMBERS_ONLY_CONTENT_TAG => return ContentTag::MembersOnly,
            SCHEDULED_LIVESTREAM_TAG => return ContentTag::ScheduledLivestream,
            UPLOADER_ATTRIBUTION_TAG => return ContentTag::UploaderAttribution,
            PURCHASE_TAG => return ContentTag::Purchase,
            RENTAL_TAG => return ContentTag::Rental,
            _ => {}
        }

        if let Some(rest) = raw
            .strip_prefix(PURCHASE_TAG)
            .and_then(|r| r.strip_prefix(':'))
        {
            return match rest.parse::<f64>() {
                Ok(price) if price.is_finite() => ContentTag::PurchasePrice {
                    cents: to_cents(price),
                },
                _ => ContentTag::LegacyPurchase(raw.to_string()),
            };
        }

        if let Some(rest) = raw
            .strip_prefix(RENTAL_TAG)
            .and_then(|r| r.strip_prefix(':'))
        {
            let mut parts = rest.splitn(2, ':');
            let price = parts.next().and_then(|p| p.parse::<f64>().ok());
            let seconds = parts.next().and_then(|s| s.parse::<i64>().ok());
            return match (price, seconds) {
                (Some(price), Some(seconds)) if price.is_finite() => ContentTag::RentalTerms {
                    cents: to_cents(price),
                    seconds,
                },
                _ => ContentTag::LegacyRental(raw.to_string()),
            };
        }

        if raw.starts_with(PURCHASE_TAG_OLD) {
            return ContentTag::LegacyPurchase(raw.to_string());
        }
        if raw.starts_with(RENTAL_TAG_OLD) {
            return ContentTag::LegacyRental(raw.to_string());
        }

        ContentTag::Other(raw.to_string())
    }

    /// Purchase or rental tag of any vintage
    pub fn is_paywall(&self) -> bool {
        matches!(
            self,
            ContentTag::Purchase
                | ContentTag::PurchasePrice { .. }
                | ContentTag::Rental
                | ContentTag::RentalTerms { .. }
                | ContentTag::LegacyPurchase(_)
                | ContentTag::LegacyRental(_)
        )
    }

    pub fn is_visibility(&self) -> bool {
        matches!(
            self,
            ContentTag::Private
                | ContentTag::Unlisted
                | ContentTag::ScheduledShow
                | ContentTag::ScheduledHide
        )
    }

    /// Marks content hidden from public listings
    pub fn is_hidden(&self) -> bool {
        matches!(self, ContentTag::Private | ContentTag::Unlisted)
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, ContentTag::ScheduledShow | ContentTag::ScheduledHide)
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTag::Private => f.write_str(PRIVATE_TAG),
            ContentTag::Unlisted => f.write_str(UNLISTED_TAG),
            ContentTag::ScheduledShow => f.write_str(SCHEDULED_SHOW_TAG),
            ContentTag::ScheduledHide => f.write_str(SCHEDULED_HIDE_TAG),
            ContentTag::MembersOnly => f.write_str(MEMBERS_ONLY_CONTENT_TAG),
            ContentTag::ScheduledLivestream => f.write_str(SCHEDULED_LIVESTREAM_TAG),
            ContentTag::UploaderAttribution => f.write_str(UPLOADER_ATTRIBUTION_TAG),
            ContentTag::Purchase => f.write_str(PURCHASE_TAG),
            ContentTag::PurchasePrice { cents } => {
                write!(f, "{}:{}", PURCHASE_TAG, format_cents(*cents))
            }
            ContentTag::Rental => f.write_str(RENTAL_TAG),
            ContentTag::RentalTerms { cents, seconds } => {
                write!(f, "{}:{}:{}", RENTAL_TAG, format_cents(*cents), seconds)
            }
            ContentTag::LegacyPurchase(raw)
            | ContentTag::LegacyRental(raw)
            | ContentTag::Other(raw) => f.write_str(raw),
        }
    }
}

/// Parsed rental terms from a claim's tags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalTerms {
    pub price: f64,
    pub expiration_seconds: i64,
}

/// Purchase price encoded in the tags, if any
pub fn parse_purchase_tag<S: AsRef<str>>(tags: &[S]) -> Option<f64> {
    tags.iter()
        .find_map(|t| match ContentTag::parse(t.as_ref()) {
            ContentTag::PurchasePrice { cents } => Some(cents as f64 / 100.0),
            _ => None,
        })
}

/// Rental price and duration encoded in the tags, if any
pub fn parse_rental_tag<S: AsRef<str>>(tags: &[S]) -> Option<RentalTerms> {
    tags.iter()
        .find_map(|t| match ContentTag::parse(t.as_ref()) {
            ContentTag::RentalTerms { cents, seconds } => Some(RentalTerms {
                price: cents as f64 / 100.0,
                expiration_seconds: seconds,
            }),
            _ => None,
        })
}

/// Insertion-ordered set of tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<ContentTag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strings<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for tag in raw {
            set.insert(ContentTag::parse(tag.as_ref()));
        }
        set
    }

    pub fn insert(&mut self, tag: ContentTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove(&mut self, tag: &ContentTag) {
        self.tags.retain(|t| t != tag);
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ContentTag) -> bool,
    {
        self.tags.retain(keep);
    }

    pub fn contains(&self, tag: &ContentTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentTag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Serialize back to wire strings
    pub fn to_strings(&self) -> Vec<String> {
        self.tags.iter().map(ToString::to_string).collect()
    }
}

/// Step 1: uploader attribution marker
pub fn apply_uploader_attribution(tags: &mut TagSet, form: &PublishFormState) {
    if form.use_uploader {
        tags.insert(ContentTag::UploaderAttribution);
    } else {
        tags.remove(&ContentTag::UploaderAttribution);
    }
}

/// Step 2: scheduled livestream marker
pub fn apply_scheduled_livestream(
    tags: &mut TagSet,
    form: &PublishFormState,
    release_time: Option<i64>,
    now: i64,
) {
    let in_future = release_time.map(|t| t > now).unwrap_or(false);
    if form.is_livestream_publish && in_future {
        tags.insert(ContentTag::ScheduledLivestream);
    } else {
        tags.remove(&ContentTag::ScheduledLivestream);
    }
}

/// Step 3: fiat purchase and rental tags
pub fn apply_fiat_paywall(tags: &mut TagSet, form: &PublishFormState) {
    tags.retain(|t| !t.is_paywall());

    // No payment options on non-public content
    if form.visibility != Visibility::Public || form.paywall != Paywall::Fiat {
        return;
    }

    let purchase = &form.fiat_purchase_fee;
    if form.fiat_purchase_enabled && !purchase.currency.is_empty() && purchase.amount > 0.0 {
        tags.insert(ContentTag::Purchase);
        tags.insert(ContentTag::PurchasePrice {
            cents: to_cents(purchase.amount),
        });
    }

    let rental = &form.fiat_rental_fee;
    let expiration = &form.fiat_rental_expiration;
    if form.fiat_rental_enabled
        && !rental.currency.is_empty()
        && rental.amount > 0.0
        && !expiration.unit.is_empty()
        && expiration.value > 0.0
    {
        tags.insert(ContentTag::Rental);
        tags.insert(ContentTag::RentalTerms {
            cents: to_cents(rental.amount),
            seconds: rental_seconds(expiration.value, &expiration.unit),
        });
    }
}

/// Step 4: members-only marker
pub fn apply_membership_restriction(
    tags: &mut TagSet,
    form: &PublishFormState,
    channel_id: Option<&str>,
) {
    tags.remove(&ContentTag::MembersOnly);

    let has_channel = channel_id.map(|id| !id.is_empty()).unwrap_or(false);
    if form.visibility != Visibility::Unlisted && form.has_membership_restrictions() && has_channel
    {
        tags.insert(ContentTag::MembersOnly);
    }
}

/// Step 5: exactly one visibility/scheduling marker
pub fn apply_visibility(tags: &mut TagSet, form: &PublishFormState) {
    tags.retain(|t| !t.is_visibility());

    match form.visibility {
        Visibility::Public => {}
        Visibility::Private => tags.insert(ContentTag::Private),
        Visibility::Unlisted => tags.insert(ContentTag::Unlisted),
        Visibility::Scheduled => {
            if form.scheduled_show {
                tags.insert(ContentTag::ScheduledShow);
            } else {
                tags.insert(ContentTag::ScheduledHide);
            }
        }
    }
}

/// Run all five reconciliation steps. Applying it twice changes nothing.
pub fn reconcile_tags(
    tags: &mut TagSet,
    form: &PublishFormState,
    release_time: Option<i64>,
    now: i64,
    channel_id: Option<&str>,
) {
    apply_uploader_attribution(tags, form);
    apply_scheduled_livestream(tags, form, release_time, now);
    apply_fiat_paywall(tags, form);
    apply_membership_restriction(tags, form, channel_id);
    apply_visibility(tags, form);
}
