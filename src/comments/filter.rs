/// Which comments the current viewer gets to see
use super::geo::{geo_restriction_for_claim, GeoBlockLists, Locale};
use super::Comment;
use crate::claims::Claim;
use crate::store::AppState;
use std::collections::{HashMap, HashSet};

/// Everything the filter reads, borrowed from one state snapshot
#[derive(Debug, Clone, Copy)]
pub struct CommentFilterInputs<'a> {
    pub claims_by_id: &'a HashMap<String, Claim>,
    pub my_claim_ids: &'a HashSet<String>,
    pub my_channel_claim_ids: &'a [String],
    pub muted_channels: &'a [String],
    pub personal_block_list: &'a [String],
    pub blacklisted_outpoints: &'a HashSet<String>,
    pub filtered_outpoints: &'a HashSet<String>,
    pub show_mature_content: bool,
    pub geo_block_list: Option<&'a GeoBlockLists>,
    pub locale: Option<&'a Locale>,
}

impl<'a> CommentFilterInputs<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            claims_by_id: &state.claims.by_id,
            my_claim_ids: &state.claims.my_claim_ids,
            my_channel_claim_ids: &state.claims.my_channel_claim_ids,
            muted_channels: &state.blocked.muted_channels,
            personal_block_list: &state.blocked.personal_block_list,
            blacklisted_outpoints: &state.blocked.blacklisted_outpoints,
            filtered_outpoints: &state.blocked.filtered_outpoints,
            show_mature_content: state.blocked.show_mature_content,
            geo_block_list: state.blocked.geo_block_list.as_ref(),
            locale: state.blocked.locale.as_ref(),
        }
    }

    fn owns_channel(&self, channel: &Claim) -> bool {
        channel.is_my_output
            || self
                .my_channel_claim_ids
                .iter()
                .any(|id| *id == channel.claim_id)
            || self.my_claim_ids.contains(&channel.claim_id)
    }

    fn is_visible(&self, comment: &Comment, claim_id: Option<&str>) -> bool {
        // An unresolved author is kept so the caller knows to resolve it
        let channel = self.claims_by_id.get(&comment.channel_id);

        if let Some(channel) = channel {
            if self.owns_channel(channel) {
                return true;
            }

            let outpoint = channel.outpoint();
            if self.blacklisted_outpoints.contains(&outpoint)
                || self.filtered_outpoints.contains(&outpoint)
            {
                return false;
            }

            if !self.show_mature_content && channel.is_nsfw() {
                return false;
            }
        }

        if let Some(claim_id) = claim_id {
            let content_is_mine = self.my_claim_ids.contains(claim_id);
            if !content_is_mine
                && self
                    .personal_block_list
                    .iter()
                    .any(|uri| *uri == comment.channel_url)
            {
                return false;
            }
        }

        if let Some(channel) = channel {
            if geo_restriction_for_claim(channel, self.locale, self.geo_block_list).is_some() {
                return false;
            }
        }

        !self
            .muted_channels
            .iter()
            .any(|uri| *uri == comment.channel_url)
    }
}

/// Keep the comments visible to the viewer, preserving order.
///
/// `None` entries are comments removed by moderation and are dropped.
/// `claim_id` is the content the comments belong to; replies are filtered
/// without one, which skips the personal block list.
pub fn filter_comments<'c>(
    comments: &[Option<&'c Comment>],
    claim_id: Option<&str>,
    inputs: &CommentFilterInputs<'_>,
) -> Vec<&'c Comment> {
    comments
        .iter()
        .filter_map(|c| *c)
        .filter(|c| inputs.is_visible(c, claim_id))
        .collect()
}
