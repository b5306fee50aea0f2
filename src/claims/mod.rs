/// Claim records and the claims state slice
///
/// Claims are resolved by an external subsystem; this module only keeps the
/// denormalized records the publish and comment logic read from, plus the
/// pending/reflecting bookkeeping written after a publish.
use crate::store::{Action, AppState};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// Tags that mark a claim as mature content
pub const MATURE_TAGS: &[&str] = &[
    "porn",
    "porno",
    "nsfw",
    "mature",
    "xxx",
    "sex",
    "creampie",
    "blowjob",
    "handjob",
    "vagina",
    "boobs",
    "big boobs",
    "big dick",
    "pussy",
    "cumshot",
    "anal",
    "hard fucking",
    "ass",
    "fuck",
    "hentai",
];

/// Resolved claim (content or channel)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub nout: u32,
    /// Staked amount in credits
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub permanent_url: Option<String>,
    /// stream, channel, collection, repost
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub is_my_output: bool,
    #[serde(default)]
    pub signing_channel: Option<Box<Claim>>,
    #[serde(default)]
    pub value: ClaimValue,
    #[serde(default)]
    pub meta: ClaimMeta,
}

/// Claim metadata body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimValue {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub release_time: Option<i64>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub stream_type: Option<String>,
    /// Present for uploaded files, absent for livestream placeholders
    #[serde(default)]
    pub source: Option<serde_json::Value>,
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Price in a given currency (SDK fee, fiat purchase or rental fee)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
}

impl Fee {
    pub fn new(amount: f64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimMeta {
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub creation_timestamp: Option<i64>,
}

/// Entry returned by the SDK `file_list` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileListItem {
    pub claim_id: String,
    #[serde(default)]
    pub is_fully_reflected: bool,
    #[serde(default)]
    pub uploading_to_reflector: bool,
    #[serde(default)]
    pub reflector_progress: Option<f64>,
}

/// Reflector upload status for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectingStatus {
    pub file_list_item: FileListItem,
    pub progress: Option<f64>,
    pub stalled: bool,
}

/// Accepts numbers or numeric strings, as the SDK mixes both
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Str(s)) if s.is_empty() => Ok(None),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Ok(v),
        Raw::Str(s) if s.is_empty() => Ok(0.0),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl Claim {
    /// `txid:nout`, the key used by blacklist and filter maps
    pub fn outpoint(&self) -> String {
        format!("{}:{}", self.txid, self.nout)
    }

    pub fn tags(&self) -> &[String] {
        &self.value.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.value.tags.iter().any(|t| t == tag)
    }

    pub fn is_channel(&self) -> bool {
        self.value_type.as_deref() == Some("channel")
    }

    pub fn is_nsfw(&self) -> bool {
        self.value
            .tags
            .iter()
            .any(|t| MATURE_TAGS.contains(&t.to_lowercase().as_str()))
    }

    /// Channel id for a channel claim, or the signing channel's id for content
    pub fn channel_id(&self) -> Option<&str> {
        if self.is_channel() {
            Some(self.claim_id.as_str())
        } else {
            self.signing_channel.as_deref().map(|c| c.claim_id.as_str())
        }
    }

    /// A stream claim without a source file is a livestream placeholder
    pub fn is_stream_placeholder(&self) -> bool {
        self.value_type.as_deref() == Some("stream") && self.value.source.is_none()
    }

    /// Claim type label reported after a publish
    pub fn claim_type_label(&self) -> String {
        match self.value_type.as_deref() {
            Some("stream") => {
                if self.value.source.is_none() {
                    "livestream".to_string()
                } else {
                    self.value
                        .stream_type
                        .clone()
                        .unwrap_or_else(|| "stream".to_string())
                }
            }
            Some(other) => other.to_string(),
            None => "undefined_claim".to_string(),
        }
    }
}

/// Claims state slice
#[derive(Debug, Clone, Default)]
pub struct ClaimsState {
    pub by_id: HashMap<String, Claim>,
    pub claim_id_by_uri: HashMap<String, String>,
    /// Ids of my content claims (channels excluded)
    pub my_claim_ids: HashSet<String>,
    pub my_channel_claim_ids: Vec<String>,
    pub pending_by_id: HashMap<String, Claim>,
    pub reflecting_by_id: HashMap<String, ReflectingStatus>,
    pub checking_reflector: bool,
}

impl ClaimsState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ResolveClaimsCompleted { resolved } => {
                for (uri, claim) in resolved {
                    self.claim_id_by_uri
                        .insert(uri.clone(), claim.claim_id.clone());
                    if let Some(url) = &claim.canonical_url {
                        self.claim_id_by_uri
                            .insert(url.clone(), claim.claim_id.clone());
                    }
                    self.by_id.insert(claim.claim_id.clone(), claim.clone());
                }
            }
            Action::SetMyClaims { claims, channels } => {
                self.my_claim_ids = claims.iter().map(|c| c.claim_id.clone()).collect();
                self.my_channel_claim_ids = channels.iter().map(|c| c.claim_id.clone()).collect();
                for claim in claims.iter().chain(channels.iter()) {
                    self.by_id.insert(claim.claim_id.clone(), claim.clone());
                    if let Some(url) = &claim.permanent_url {
                        self.claim_id_by_uri
                            .insert(url.clone(), claim.claim_id.clone());
                    }
                }
            }
            Action::UpdatePendingClaims { claims } => {
                for claim in claims {
                    self.pending_by_id
                        .insert(claim.claim_id.clone(), claim.clone());
                    self.by_id.insert(claim.claim_id.clone(), claim.clone());
                    if let Some(url) = &claim.permanent_url {
                        self.claim_id_by_uri
                            .insert(url.clone(), claim.claim_id.clone());
                    }
                }
            }
            Action::AddFilesReflecting { claim } => {
                self.reflecting_by_id.insert(
                    claim.claim_id.clone(),
                    ReflectingStatus {
                        file_list_item: FileListItem {
                            claim_id: claim.claim_id.clone(),
                            ..FileListItem::default()
                        },
                        progress: Some(0.0),
                        stalled: false,
                    },
                );
            }
            Action::UpdateFilesReflecting { reflecting_by_id } => {
                self.reflecting_by_id = reflecting_by_id.clone();
            }
            Action::ToggleCheckingReflecting(checking) => {
                self.checking_reflector = *checking;
            }
            _ => {}
        }
    }
}

pub fn claim_for_id<'a>(state: &'a AppState, claim_id: &str) -> Option<&'a Claim> {
    state.claims.by_id.get(claim_id)
}

pub fn claim_id_for_uri<'a>(state: &'a AppState, uri: &str) -> Option<&'a str> {
    state.claims.claim_id_by_uri.get(uri).map(String::as_str)
}

pub fn claim_for_uri<'a>(state: &'a AppState, uri: &str) -> Option<&'a Claim> {
    claim_id_for_uri(state, uri).and_then(|id| claim_for_id(state, id))
}

/// My channel claims, in the order they were listed
pub fn my_channel_claims(state: &AppState) -> Vec<&Claim> {
    state
        .claims
        .my_channel_claim_ids
        .iter()
        .filter_map(|id| state.claims.by_id.get(id))
        .collect()
}

/// The claim at `uri`, if it is one of mine
pub fn my_claim_for_uri<'a>(state: &'a AppState, uri: &str) -> Option<&'a Claim> {
    let claim = claim_for_uri(state, uri)?;
    if state.claims.my_claim_ids.contains(&claim.claim_id) || claim.is_my_output {
        Some(claim)
    } else {
        None
    }
}

/// The claim being edited by the publish form, if it is one of mine
pub fn my_claim_for_editing_uri(state: &AppState) -> Option<&Claim> {
    let uri = state.publish.form.editing_uri.as_deref()?;
    my_claim_for_uri(state, uri)
}

pub fn reflecting_by_id(state: &AppState) -> &HashMap<String, ReflectingStatus> {
    &state.claims.reflecting_by_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_deserializes_string_fields() {
        let claim: Claim = serde_json::from_value(serde_json::json!({
            "claim_id": "abc",
            "name": "video",
            "amount": "0.01",
            "timestamp": 1600000000,
            "value_type": "stream",
            "value": { "release_time": "1599999999", "tags": ["c:unlisted"] },
            "meta": { "creation_timestamp": 1500000000 }
        }))
        .unwrap();

        assert_eq!(claim.amount, 0.01);
        assert_eq!(claim.value.release_time, Some(1599999999));
        assert_eq!(claim.meta.creation_timestamp, Some(1500000000));
        assert!(claim.has_tag("c:unlisted"));
        assert!(claim.is_stream_placeholder());
    }

    #[test]
    fn test_outpoint_and_channel_id() {
        let channel = Claim {
            claim_id: "chan".to_string(),
            value_type: Some("channel".to_string()),
            txid: "tx".to_string(),
            nout: 1,
            ..Claim::default()
        };
        let stream = Claim {
            claim_id: "stream".to_string(),
            signing_channel: Some(Box::new(channel.clone())),
            ..Claim::default()
        };

        assert_eq!(channel.outpoint(), "tx:1");
        assert_eq!(channel.channel_id(), Some("chan"));
        assert_eq!(stream.channel_id(), Some("chan"));
    }

    #[test]
    fn test_nsfw_detection_is_case_insensitive() {
        let mut claim = Claim::default();
        claim.value.tags = vec!["Mature".to_string()];
        assert!(claim.is_nsfw());
        claim.value.tags = vec!["music".to_string()];
        assert!(!claim.is_nsfw());
    }

    #[test]
    fn test_claim_type_label() {
        let mut claim = Claim {
            value_type: Some("stream".to_string()),
            ..Claim::default()
        };
        assert_eq!(claim.claim_type_label(), "livestream");

        claim.value.source = Some(serde_json::json!({ "sd_hash": "x" }));
        claim.value.stream_type = Some("video".to_string());
        assert_eq!(claim.claim_type_label(), "video");

        claim.value_type = Some("collection".to_string());
        assert_eq!(claim.claim_type_label(), "collection");
    }

    #[test]
    fn test_reflecting_lifecycle() {
        let mut state = ClaimsState::default();
        let claim = Claim {
            claim_id: "abc".to_string(),
            ..Claim::default()
        };

        state.apply(&Action::AddFilesReflecting {
            claim: claim.clone(),
        });
        assert!(state.reflecting_by_id.contains_key("abc"));

        state.apply(&Action::UpdateFilesReflecting {
            reflecting_by_id: HashMap::new(),
        });
        assert!(state.reflecting_by_id.is_empty());

        state.apply(&Action::ToggleCheckingReflecting(true));
        assert!(state.checking_reflector);
    }

    #[test]
    fn test_my_claim_for_uri_requires_ownership() {
        let mine = Claim {
            claim_id: "mine".to_string(),
            name: "clip".to_string(),
            permanent_url: Some("lbry://clip#mine".to_string()),
            ..Claim::default()
        };
        let theirs = Claim {
            claim_id: "theirs".to_string(),
            name: "other".to_string(),
            ..Claim::default()
        };

        let mut state = AppState::default();
        state.claims.apply(&Action::SetMyClaims {
            claims: vec![mine],
            channels: vec![],
        });
        state.claims.apply(&Action::ResolveClaimsCompleted {
            resolved: vec![("lbry://other#theirs".to_string(), theirs)],
        });

        assert!(my_claim_for_uri(&state, "lbry://clip#mine").is_some());
        assert!(my_claim_for_uri(&state, "lbry://other#theirs").is_none());
        assert!(claim_for_uri(&state, "lbry://other#theirs").is_some());

        state.publish.form.editing_uri = Some("lbry://clip#mine".to_string());
        assert_eq!(
            my_claim_for_editing_uri(&state).map(|c| c.claim_id.as_str()),
            Some("mine")
        );
        assert!(reflecting_by_id(&state).is_empty());
    }
}
