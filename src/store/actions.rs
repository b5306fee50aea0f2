/// Every state transition the store accepts
use crate::claims::{Claim, ReflectingStatus};
use crate::comments::geo::{GeoBlockLists, Locale};
use crate::comments::Comment;
use crate::error::ErrorNotice;
use crate::memberships::{MembershipTier, MyMembership};
use crate::publish::form::{PublishFormState, PublishFormUpdate};
use crate::publish::reducer::{UploadItem, UploadStatus};
use crate::search::SearchOptions;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Publish
    UpdatePublishForm(PublishFormUpdate),
    ClearPublish,
    PublishStart,
    PublishSuccess {
        claim_type: String,
    },
    PublishFail,
    PrepareEdit(Box<PublishFormState>),
    UpdateUploadAdd {
        item: UploadItem,
    },
    UpdateUploadProgress {
        guid: String,
        progress: Option<f64>,
        status: Option<UploadStatus>,
    },
    UpdateUploadRemove {
        guid: String,
    },

    // Claims
    /// Pairs of (uri, claim) from a resolve pass
    ResolveClaimsCompleted {
        resolved: Vec<(String, Claim)>,
    },
    SetMyClaims {
        claims: Vec<Claim>,
        channels: Vec<Claim>,
    },
    UpdatePendingClaims {
        claims: Vec<Claim>,
    },
    AddFilesReflecting {
        claim: Claim,
    },
    UpdateFilesReflecting {
        reflecting_by_id: HashMap<String, ReflectingStatus>,
    },
    ToggleCheckingReflecting(bool),

    // Comments
    CommentListCompleted {
        claim_id: String,
        /// Set when the page holds replies to this comment
        parent_id: Option<String>,
        comments: Vec<Comment>,
        total_items: usize,
        total_filtered_items: usize,
        total_pages: usize,
    },
    CommentCreateCompleted {
        claim_id: String,
        comment: Comment,
    },
    CommentModerationRemoved {
        comment_id: String,
    },
    CommentPinCompleted {
        claim_id: String,
        comment_id: String,
        unpin: bool,
    },

    // Blocked / settings
    ToggleMuteChannel {
        uri: String,
    },
    ToggleBlockChannel {
        uri: String,
    },
    SetBlacklisted {
        outpoints: Vec<String>,
    },
    SetFiltered {
        outpoints: Vec<String>,
    },
    SetGeoBlockList(GeoBlockLists),
    SetLocale(Locale),
    SetShowMatureContent(bool),

    // Memberships
    ChannelMembershipCheckStarted {
        channel_id: String,
        ids: Vec<String>,
    },
    ChannelMembershipCheckCompleted {
        channel_id: String,
        memberships_by_id: HashMap<String, Vec<String>>,
    },
    ChannelMembershipCheckFailed {
        channel_id: String,
    },
    SetMembershipData(Vec<MyMembership>),
    ListMembershipData {
        channel_id: String,
        list: Vec<MembershipTier>,
    },
    MembershipPerkListComplete(Vec<MembershipTier>),
    ProtectedContentFetched {
        channel_id: String,
        claim_id: String,
        membership_ids: Vec<String>,
    },

    // Search
    UpdateSearchQuery(String),
    SearchStart,
    SearchSuccess {
        query: String,
        from: Option<u32>,
        size: Option<u32>,
        uris: Vec<String>,
        recsys: Option<String>,
    },
    SearchFail,
    UpdateSearchOptions(SearchOptions),
    SetMentionSearchResults {
        query: String,
        uris: Vec<String>,
    },

    // Notifications
    Error(ErrorNotice),
    DismissError,
}

impl Action {
    /// Short name used in dispatch logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::UpdatePublishForm(_) => "UPDATE_PUBLISH_FORM",
            Action::ClearPublish => "CLEAR_PUBLISH",
            Action::PublishStart => "PUBLISH_START",
            Action::PublishSuccess { .. } => "PUBLISH_SUCCESS",
            Action::PublishFail => "PUBLISH_FAIL",
            Action::PrepareEdit(_) => "DO_PREPARE_EDIT",
            Action::UpdateUploadAdd { .. } => "UPDATE_UPLOAD_ADD",
            Action::UpdateUploadProgress { .. } => "UPDATE_UPLOAD_PROGRESS",
            Action::UpdateUploadRemove { .. } => "UPDATE_UPLOAD_REMOVE",
            Action::ResolveClaimsCompleted { .. } => "RESOLVE_URIS_COMPLETED",
            Action::SetMyClaims { .. } => "FETCH_CLAIM_LIST_MINE_COMPLETED",
            Action::UpdatePendingClaims { .. } => "UPDATE_PENDING_CLAIMS",
            Action::AddFilesReflecting { .. } => "ADD_FILES_REFLECTING",
            Action::UpdateFilesReflecting { .. } => "UPDATE_FILES_REFLECTING",
            Action::ToggleCheckingReflecting(_) => "TOGGLE_CHECKING_REFLECTING",
            Action::CommentListCompleted { .. } => "COMMENT_LIST_COMPLETED",
            Action::CommentCreateCompleted { .. } => "COMMENT_CREATE_COMPLETED",
            Action::CommentModerationRemoved { .. } => "COMMENT_MODERATION_REMOVED",
            Action::CommentPinCompleted { .. } => "COMMENT_PIN_COMPLETED",
            Action::ToggleMuteChannel { .. } => "CHANNEL_MUTE_TOGGLE",
            Action::ToggleBlockChannel { .. } => "CHANNEL_BLOCK_TOGGLE",
            Action::SetBlacklisted { .. } => "FETCH_BLACKLISTED_CONTENT_COMPLETED",
            Action::SetFiltered { .. } => "FETCH_FILTERED_CONTENT_COMPLETED",
            Action::SetGeoBlockList(_) => "FETCH_GBL_DONE",
            Action::SetLocale(_) => "USER_FETCH_LOCALE_DONE",
            Action::SetShowMatureContent(_) => "CLIENT_SETTING_CHANGED",
            Action::ChannelMembershipCheckStarted { .. } => "CHANNEL_MEMBERSHIP_CHECK_STARTED",
            Action::ChannelMembershipCheckCompleted { .. } => "CHANNEL_MEMBERSHIP_CHECK_COMPLETED",
            Action::ChannelMembershipCheckFailed { .. } => "CHANNEL_MEMBERSHIP_CHECK_FAILED",
            Action::SetMembershipData(_) => "SET_MEMBERSHIP_DATA",
            Action::ListMembershipData { .. } => "LIST_MEMBERSHIP_DATA",
            Action::MembershipPerkListComplete(_) => "MEMBERSHIP_PERK_LIST_COMPLETE",
            Action::ProtectedContentFetched { .. } => "GET_MEMBERSHIP_TIERS_FOR_CONTENT_SUCCESS",
            Action::UpdateSearchQuery(_) => "UPDATE_SEARCH_QUERY",
            Action::SearchStart => "SEARCH_START",
            Action::SearchSuccess { .. } => "SEARCH_SUCCESS",
            Action::SearchFail => "SEARCH_FAIL",
            Action::UpdateSearchOptions(_) => "UPDATE_SEARCH_OPTIONS",
            Action::SetMentionSearchResults { .. } => "SET_MENTION_SEARCH_RESULTS",
            Action::Error(_) => "CREATE_ERROR",
            Action::DismissError => "DISMISS_ERROR",
        }
    }
}
