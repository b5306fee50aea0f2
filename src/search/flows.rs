/// Search flows: run queries against the backend and record results
use super::{
    normalize_query, process_search_results, search_query_string, search_uris_for_query,
    SearchOptions, DEFAULT_SEARCH_SIZE,
};
use crate::claims::claim_for_uri;
use crate::context::AppContext;
use crate::error::ClientResult;
use crate::store::Action;
use tracing::{debug, info, warn};

/// Cached URIs are enough unless the caller pages past the end of them
fn cached_is_sufficient(cached_len: usize, options: &SearchOptions) -> bool {
    match (options.size, options.from) {
        (Some(size), Some(from)) if size > 0 && from > 0 => {
            (from as usize).saturating_add(size as usize) < cached_len
        }
        _ => true,
    }
}

/// Run a search and return the result URIs.
///
/// An empty query records a failed search and returns no results.
pub async fn do_search(
    ctx: &AppContext,
    raw_query: &str,
    options: SearchOptions,
) -> ClientResult<Vec<String>> {
    let query = normalize_query(raw_query);
    if query.is_empty() {
        ctx.store.dispatch(Action::SearchFail).await;
        return Ok(Vec::new());
    }

    let mut options = options;
    if options.nsfw.is_none() {
        options.nsfw = Some(ctx.store.select(|s| s.blocked.show_mature_content).await);
    }

    let query_string = search_query_string(&query, &options);

    let cached = ctx
        .store
        .select(|s| search_uris_for_query(s, &query_string).map(<[String]>::to_vec))
        .await;
    if let Some(uris) = cached.filter(|uris| !uris.is_empty()) {
        if cached_is_sufficient(uris.len(), &options) {
            debug!("Search cache hit for {}", query_string);
            return Ok(uris);
        }
    }

    ctx.store.dispatch(Action::SearchStart).await;

    let response = if options.related_to.is_some() {
        ctx.search.search_recommendations(&query_string).await
    } else {
        ctx.search.search(&query_string).await
    };

    match response {
        Ok(response) => {
            let uris = process_search_results(&response.body);
            info!("Search '{}' returned {} results", query, uris.len());
            ctx.store
                .dispatch(Action::SearchSuccess {
                    query: query_string,
                    from: options.from,
                    size: options.size,
                    uris: uris.clone(),
                    recsys: response.powered_by,
                })
                .await;
            Ok(uris)
        }
        Err(e) => {
            warn!("Search '{}' failed: {}", query, e);
            ctx.store.dispatch(Action::SearchFail).await;
            Err(e)
        }
    }
}

/// Merge new options, then rerun the current search if there is one
pub async fn do_update_search_options(
    ctx: &AppContext,
    new_options: SearchOptions,
    additional_options: SearchOptions,
) -> ClientResult<Option<Vec<String>>> {
    let search_value = ctx.store.select(|s| s.search.search_value.clone()).await;

    ctx.store
        .dispatch(Action::UpdateSearchOptions(new_options))
        .await;

    if search_value.is_empty() {
        return Ok(None);
    }

    do_search(ctx, &search_value, additional_options)
        .await
        .map(Some)
}

pub async fn do_set_mention_search_results(ctx: &AppContext, query: &str, uris: Vec<String>) {
    ctx.store
        .dispatch(Action::SetMentionSearchResults {
            query: query.to_string(),
            uris,
        })
        .await;
}

/// Options for a related-content search seeded by one claim
pub fn recommendation_search_options(
    mature_enabled: bool,
    claim_is_mature: bool,
    claim_id: &str,
) -> SearchOptions {
    SearchOptions {
        size: Some(DEFAULT_SEARCH_SIZE),
        related_to: Some(claim_id.to_string()),
        nsfw: Some(mature_enabled || claim_is_mature),
        is_background_search: true,
        ..SearchOptions::default()
    }
}

/// Search for content related to the claim at `uri`, using its title
pub async fn do_fetch_recommended_content(
    ctx: &AppContext,
    uri: &str,
) -> ClientResult<Option<Vec<String>>> {
    let seed = ctx
        .store
        .select(|s| {
            claim_for_uri(s, uri).and_then(|claim| {
                let title = claim.value.title.clone().filter(|t| !t.is_empty())?;
                let options = recommendation_search_options(
                    s.blocked.show_mature_content,
                    claim.is_nsfw(),
                    &claim.claim_id,
                );
                Some((title, options))
            })
        })
        .await;

    match seed {
        Some((title, options)) => do_search(ctx, &title, options).await.map(Some),
        None => Ok(None),
    }
}
