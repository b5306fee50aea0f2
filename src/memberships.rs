/// Channel membership state
///
/// Purchase flows live elsewhere; this slice only caches what membership
/// tiers exist, which ones the viewer holds, and which tiers guard a piece
/// of content.
use crate::store::{Action, AppState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A membership tier offered by a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipTier {
    pub membership_id: String,
    pub channel_claim_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub perks: Vec<String>,
}

/// A membership the viewer holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyMembership {
    pub membership_id: String,
    pub channel_claim_id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MembershipsState {
    /// Channel -> viewer channel ids being checked
    pub fetching_ids: HashMap<String, Vec<String>>,
    /// Channel -> (viewer channel id -> membership names). `None` after a
    /// failed check.
    pub fetched_by_id: HashMap<String, Option<HashMap<String, Vec<String>>>>,
    pub membership_list_by_id: HashMap<String, Vec<MembershipTier>>,
    pub membership_mine: Option<Vec<MyMembership>>,
    pub my_membership_tiers: Option<Vec<MembershipTier>>,
    /// Channel -> content claim -> membership ids guarding it
    pub protected_content_by_id: HashMap<String, HashMap<String, Vec<String>>>,
}

impl MembershipsState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ChannelMembershipCheckStarted { channel_id, ids } => {
                self.fetching_ids.insert(channel_id.clone(), ids.clone());
            }
            Action::ChannelMembershipCheckCompleted {
                channel_id,
                memberships_by_id,
            } => {
                self.fetching_ids.remove(channel_id);
                let entry = self
                    .fetched_by_id
                    .entry(channel_id.clone())
                    .or_insert(None)
                    .get_or_insert_with(HashMap::new);
                for (id, names) in memberships_by_id {
                    entry.insert(id.clone(), names.clone());
                }
            }
            Action::ChannelMembershipCheckFailed { channel_id } => {
                self.fetching_ids.remove(channel_id);
                self.fetched_by_id.insert(channel_id.clone(), None);
            }
            Action::SetMembershipData(mine) => {
                self.membership_mine = Some(mine.clone());
            }
            Action::ListMembershipData { channel_id, list } => {
                self.membership_list_by_id
                    .insert(channel_id.clone(), list.clone());
            }
            Action::MembershipPerkListComplete(tiers) => {
                self.my_membership_tiers = Some(tiers.clone());
            }
            Action::ProtectedContentFetched {
                channel_id,
                claim_id,
                membership_ids,
            } => {
                self.protected_content_by_id
                    .entry(channel_id.clone())
                    .or_default()
                    .insert(claim_id.clone(), membership_ids.clone());
            }
            _ => {}
        }
    }
}

/// Membership ids guarding a claim; `None` when not fetched yet
pub fn protected_content_memberships_for_claim<'a>(
    state: &'a AppState,
    channel_id: &str,
    claim_id: &str,
) -> Option<&'a [String]> {
    state
        .memberships
        .protected_content_by_id
        .get(channel_id)?
        .get(claim_id)
        .map(Vec::as_slice)
}

/// Tiers a channel offers, if listed
pub fn membership_tiers_for_channel<'a>(
    state: &'a AppState,
    channel_id: &str,
) -> Option<&'a [MembershipTier]> {
    state
        .memberships
        .membership_list_by_id
        .get(channel_id)
        .map(Vec::as_slice)
}
