/// Comments: records, visibility filtering and the comments state slice
pub mod filter;
pub mod geo;
pub mod reducer;
pub mod selectors;

use serde::{Deserialize, Serialize};

/// A comment as returned by the comment API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub comment_id: String,
    pub claim_id: String,
    /// Claim id of the commenting channel
    pub channel_id: String,
    pub channel_url: String,
    pub channel_name: Option<String>,
    pub parent_id: Option<String>,
    pub comment: String,
    pub timestamp: i64,
    pub replies: u32,
    pub is_pinned: bool,
    pub is_hidden: bool,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

pub use filter::{filter_comments, CommentFilterInputs};
pub use geo::{geo_restriction_for_claim, GeoBlockLists, GeoRestriction, Locale};
