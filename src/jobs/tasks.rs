/// Background task implementations
use crate::{
    claims::ReflectingStatus,
    context::AppContext,
    error::ClientResult,
    store::Action,
};
use futures::future::join_all;
use std::collections::HashMap;

/// One reflector check pass.
///
/// Queries `file_list` for every reflecting claim, keeps the ones still
/// uploading and returns how many remain. When any lookup fails the state is
/// left untouched for the next pass.
pub async fn check_reflecting_files(ctx: &AppContext) -> ClientResult<usize> {
    let ids: Vec<String> = ctx
        .store
        .select(|s| s.claims.reflecting_by_id.keys().cloned().collect())
        .await;

    if ids.is_empty() {
        ctx.store
            .dispatch(Action::ToggleCheckingReflecting(false))
            .await;
        return Ok(0);
    }

    // TODO: switch to one file_list call with every claim id once the SDK accepts a list
    let results = join_all(ids.iter().map(|id| ctx.sdk.file_list(id))).await;

    let mut reflecting_by_id = HashMap::new();
    for result in results {
        let response = result?;
        if let Some(item) = response.items.into_iter().next() {
            let done = item.is_fully_reflected;
            let uploading = item.uploading_to_reflector;
            if uploading {
                reflecting_by_id.insert(
                    item.claim_id.clone(),
                    ReflectingStatus {
                        progress: item.reflector_progress,
                        stalled: !done && !uploading,
                        file_list_item: item,
                    },
                );
            }
        }
    }

    let remaining = reflecting_by_id.len();
    let mut actions = vec![Action::UpdateFilesReflecting { reflecting_by_id }];
    if remaining == 0 {
        actions.push(Action::ToggleCheckingReflecting(false));
    }
    ctx.store.dispatch_batch(actions).await;

    Ok(remaining)
}
