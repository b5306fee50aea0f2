/// Geographic content restrictions
use crate::claims::Claim;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Special restriction id applying to every EU member country
pub const EU_ONLY: &str = "EU-ONLY";

/// One restriction rule; `id` is a country code, continent code or special
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRestriction {
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Restrictions attached to one channel or claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoBlockEntry {
    pub specials: Vec<GeoRestriction>,
    pub countries: Vec<GeoRestriction>,
    pub continents: Vec<GeoRestriction>,
}

/// Geo block list, keyed by channel id or claim id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoBlockLists {
    pub livestreams: HashMap<String, GeoBlockEntry>,
    pub videos: HashMap<String, GeoBlockEntry>,
}

/// Where the viewer is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub country: String,
    pub continent: String,
    #[serde(default)]
    pub is_eu_member: bool,
}

impl GeoBlockEntry {
    fn restriction_for(&self, locale: &Locale) -> Option<&GeoRestriction> {
        if locale.is_eu_member {
            if let Some(r) = self.specials.iter().find(|r| r.id == EU_ONLY) {
                return Some(r);
            }
        }

        self.countries
            .iter()
            .find(|r| r.id == locale.country)
            .or_else(|| self.continents.iter().find(|r| r.id == locale.continent))
    }
}

fn lookup<'a>(
    list: &'a HashMap<String, GeoBlockEntry>,
    claim: &Claim,
    locale: &Locale,
) -> Option<&'a GeoRestriction> {
    let channel_entry = claim.channel_id().and_then(|id| list.get(id));
    let claim_entry = list.get(&claim.claim_id);

    channel_entry
        .and_then(|e| e.restriction_for(locale))
        .or_else(|| claim_entry.and_then(|e| e.restriction_for(locale)))
}

/// Restriction that hides `claim` from a viewer at `locale`, if any
pub fn geo_restriction_for_claim<'a>(
    claim: &Claim,
    locale: Option<&Locale>,
    lists: Option<&'a GeoBlockLists>,
) -> Option<&'a GeoRestriction> {
    let locale = locale?;
    let lists = lists?;

    if claim.is_stream_placeholder() {
        if let Some(r) = lookup(&lists.livestreams, claim, locale) {
            return Some(r);
        }
    }

    lookup(&lists.videos, claim, locale)
}
