/// Search: query encoding, result mapping and the search state slice
pub mod flows;
pub mod uri;

use crate::api::SearchHit;
use crate::store::{Action, AppState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uri::{build_uri, is_uri_valid};

pub const DEFAULT_SEARCH_SIZE: u32 = 20;
pub const DEFAULT_SEARCH_FROM: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub size: Option<u32>,
    pub from: Option<u32>,
    /// Claim id to find related content for
    pub related_to: Option<String>,
    pub nsfw: Option<bool>,
    pub free_only: bool,
    pub is_background_search: bool,
}

impl SearchOptions {
    /// Overlay the fields set in `other`
    pub fn merge(&mut self, other: &SearchOptions) {
        if other.size.is_some() {
            self.size = other.size;
        }
        if other.from.is_some() {
            self.from = other.from;
        }
        if other.related_to.is_some() {
            self.related_to = other.related_to.clone();
        }
        if other.nsfw.is_some() {
            self.nsfw = other.nsfw;
        }
        self.free_only = other.free_only;
        self.is_background_search = other.is_background_search;
    }
}

/// Strip the URI scheme and turn the first path separator into a space
pub fn normalize_query(raw: &str) -> String {
    let without_scheme = if raw.len() >= uri::PROTOCOL.len()
        && raw.is_char_boundary(uri::PROTOCOL.len())
        && raw[..uri::PROTOCOL.len()].eq_ignore_ascii_case(uri::PROTOCOL)
    {
        &raw[uri::PROTOCOL.len()..]
    } else {
        raw
    };
    without_scheme.replacen('/', " ", 1)
}

/// Query string sent to the search backend
pub fn search_query_string(query: &str, options: &SearchOptions) -> String {
    let mut params = vec![
        format!("s={}", urlencoding::encode(query)),
        format!("size={}", options.size.unwrap_or(DEFAULT_SEARCH_SIZE)),
        format!("from={}", options.from.unwrap_or(DEFAULT_SEARCH_FROM)),
    ];

    if let Some(related_to) = &options.related_to {
        params.push(format!("related_to={}", urlencoding::encode(related_to)));
    }
    if options.free_only {
        params.push("free_only=true".to_string());
    }
    if options.nsfw == Some(false) {
        params.push("nsfw=false".to_string());
    }

    params.join("&")
}

/// Cache key for a query string: paging offset removed so pages of the same
/// search share one result list
pub fn normalized_search_key(query_string: &str) -> String {
    query_string
        .split('&')
        .filter(|p| !p.starts_with("from="))
        .collect::<Vec<_>>()
        .join("&")
}

/// Map search hits to canonical URIs, dropping invalid ones
pub fn process_search_results(hits: &[SearchHit]) -> Vec<String> {
    hits.iter()
        .map(|hit| build_uri(&hit.name, &hit.claim_id))
        .filter(|uri| is_uri_valid(uri))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub search_value: String,
    pub options: SearchOptions,
    /// Normalized query key -> result URIs
    pub uris_by_query: HashMap<String, Vec<String>>,
    /// Normalized query key -> backend that produced the results
    pub recsys_by_query: HashMap<String, String>,
    pub searching: bool,
    pub mention_query: Option<String>,
    pub mention_uris: Vec<String>,
}

impl SearchState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::UpdateSearchQuery(query) => {
                self.search_value = query.clone();
            }
            Action::SearchStart => {
                self.searching = true;
            }
            Action::SearchSuccess {
                query,
                from,
                size: _,
                uris,
                recsys,
            } => {
                let key = normalized_search_key(query);
                let merged = match self.uris_by_query.get(&key) {
                    Some(existing) if from.unwrap_or(0) != 0 => {
                        let mut merged = existing.clone();
                        for uri in uris {
                            if !merged.contains(uri) {
                                merged.push(uri.clone());
                            }
                        }
                        merged
                    }
                    _ => uris.clone(),
                };
                self.uris_by_query.insert(key.clone(), merged);
                if let Some(recsys) = recsys {
                    self.recsys_by_query.insert(key, recsys.clone());
                }
                self.searching = false;
            }
            Action::SearchFail => {
                self.searching = false;
            }
            Action::UpdateSearchOptions(options) => {
                self.options.merge(options);
            }
            Action::SetMentionSearchResults { query, uris } => {
                self.mention_query = Some(query.clone());
                self.mention_uris = uris.clone();
            }
            _ => {}
        }
    }
}

/// Cached result URIs for a query string
pub fn search_uris_for_query<'a>(state: &'a AppState, query_string: &str) -> Option<&'a [String]> {
    state
        .search
        .uris_by_query
        .get(&normalized_search_key(query_string))
        .map(Vec::as_slice)
}
