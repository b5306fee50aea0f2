/// Derived comment views over the state snapshot
use super::filter::{filter_comments, CommentFilterInputs};
use super::Comment;
use crate::claims::claim_id_for_uri;
use crate::store::AppState;

/// Resolve ids to records; removed comments come back as `None`
fn lookup<'a>(state: &'a AppState, ids: &[String]) -> Vec<Option<&'a Comment>> {
    ids.iter()
        .map(|id| state.comments.comment_by_id.get(id))
        .collect()
}

/// Every loaded comment on a claim that the viewer may see
pub fn comments_for_claim<'a>(state: &'a AppState, claim_id: &str) -> Vec<&'a Comment> {
    let Some(ids) = state.comments.by_id.get(claim_id) else {
        return Vec::new();
    };
    let inputs = CommentFilterInputs::from_state(state);
    filter_comments(&lookup(state, ids), Some(claim_id), &inputs)
}

pub fn comments_for_uri<'a>(state: &'a AppState, uri: &str) -> Vec<&'a Comment> {
    match claim_id_for_uri(state, uri) {
        Some(claim_id) => comments_for_claim(state, claim_id),
        None => Vec::new(),
    }
}

/// Visible top-level comments. `max_count` truncates before filtering.
pub fn top_level_comments_for_claim<'a>(
    state: &'a AppState,
    claim_id: &str,
    max_count: Option<usize>,
) -> Vec<&'a Comment> {
    let Some(ids) = state.comments.top_level_by_id.get(claim_id) else {
        return Vec::new();
    };
    let ids = match max_count {
        Some(max) if max > 0 && max < ids.len() => &ids[..max],
        _ => &ids[..],
    };
    let inputs = CommentFilterInputs::from_state(state);
    filter_comments(&lookup(state, ids), Some(claim_id), &inputs)
}

pub fn top_level_comments_for_uri<'a>(
    state: &'a AppState,
    uri: &str,
    max_count: Option<usize>,
) -> Vec<&'a Comment> {
    match claim_id_for_uri(state, uri) {
        Some(claim_id) => top_level_comments_for_claim(state, claim_id, max_count),
        None => Vec::new(),
    }
}

/// Visible replies to a comment
pub fn replies_for_parent<'a>(state: &'a AppState, parent_id: &str) -> Vec<&'a Comment> {
    let Some(ids) = state.comments.replies_by_parent_id.get(parent_id) else {
        return Vec::new();
    };
    let inputs = CommentFilterInputs::from_state(state);
    filter_comments(&lookup(state, ids), None, &inputs)
}

pub fn pinned_comments_for_claim<'a>(state: &'a AppState, claim_id: &str) -> Vec<&'a Comment> {
    state
        .comments
        .pinned_by_id
        .get(claim_id)
        .map(|ids| lookup(state, ids).into_iter().flatten().collect())
        .unwrap_or_default()
}

pub fn total_comments_for_claim(state: &AppState, claim_id: &str) -> usize {
    state
        .comments
        .total_by_id
        .get(claim_id)
        .copied()
        .unwrap_or(0)
}

pub fn top_level_total_pages(state: &AppState, claim_id: &str) -> usize {
    state
        .comments
        .top_level_total_pages_by_id
        .get(claim_id)
        .copied()
        .unwrap_or(0)
}

pub fn reply_total_pages(state: &AppState, parent_id: &str) -> usize {
    state
        .comments
        .replies_total_pages_by_parent_id
        .get(parent_id)
        .copied()
        .unwrap_or(0)
}

/// Heading shown above a comment list
pub fn comments_list_title(total: usize) -> String {
    match total {
        0 => "Leave a comment".to_string(),
        1 => "1 comment".to_string(),
        n => format!("{} comments", n),
    }
}

pub fn comments_list_title_for_uri(state: &AppState, uri: &str) -> String {
    let total = claim_id_for_uri(state, uri)
        .map(|id| total_comments_for_claim(state, id))
        .unwrap_or(0);
    comments_list_title(total)
}
