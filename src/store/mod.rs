/// Application state store
///
/// All state lives in one [`AppState`] snapshot. Each [`Action`] is applied
/// by [`reduce`], a plain transition function; the [`Store`] serializes
/// dispatches behind a write lock so every action lands atomically.
pub mod actions;

pub use actions::Action;

use crate::blocked::BlockedState;
use crate::claims::ClaimsState;
use crate::comments::reducer::CommentsState;
use crate::error::ErrorNotice;
use crate::memberships::MembershipsState;
use crate::publish::reducer::PublishState;
use crate::search::SearchState;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Complete client state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub publish: PublishState,
    pub claims: ClaimsState,
    pub comments: CommentsState,
    pub blocked: BlockedState,
    pub memberships: MembershipsState,
    pub search: SearchState,
    /// Pending user-facing error notifications, oldest first
    pub errors: Vec<ErrorNotice>,
}

impl AppState {
    fn apply_errors(&mut self, action: &Action) {
        match action {
            Action::Error(notice) => self.errors.push(notice.clone()),
            Action::DismissError => {
                if !self.errors.is_empty() {
                    self.errors.remove(0);
                }
            }
            _ => {}
        }
    }
}

/// Apply one action to a state snapshot
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    state.publish.apply(action);
    state.claims.apply(action);
    state.comments.apply(action);
    state.blocked.apply(action);
    state.memberships.apply(action);
    state.search.apply(action);
    state.apply_errors(action);
    state
}

/// Shared handle to the application state
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<RwLock<AppState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Apply a single action
    pub async fn dispatch(&self, action: Action) {
        let mut guard = self.state.write().await;
        debug!("dispatch {}", action.name());
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, &action);
    }

    /// Apply several actions under one lock, so readers never observe a
    /// partially applied batch
    pub async fn dispatch_batch(&self, actions: Vec<Action>) {
        let mut guard = self.state.write().await;
        let mut state = std::mem::take(&mut *guard);
        for action in &actions {
            debug!("dispatch {} (batched)", action.name());
            state = reduce(state, action);
        }
        *guard = state;
    }

    /// Apply `action` only if `predicate` holds, checked under the same lock.
    /// Returns whether the action was applied.
    pub async fn dispatch_when<F>(&self, predicate: F, action: Action) -> bool
    where
        F: FnOnce(&AppState) -> bool,
    {
        let mut guard = self.state.write().await;
        if !predicate(&guard) {
            return false;
        }
        debug!("dispatch {}", action.name());
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, &action);
        true
    }

    /// Run a selector against the current state
    pub async fn select<T, F>(&self, selector: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        let guard = self.state.read().await;
        selector(&guard)
    }

    /// Clone of the current state
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::form::PublishFormUpdate;

    #[test]
    fn test_reduce_routes_to_slices() {
        let state = reduce(
            AppState::default(),
            &Action::UpdatePublishForm(PublishFormUpdate {
                name: Some("clip".to_string()),
                ..PublishFormUpdate::default()
            }),
        );
        let state = reduce(state, &Action::ToggleCheckingReflecting(true));
        let state = reduce(state, &Action::SetShowMatureContent(true));

        assert_eq!(state.publish.form.name, "clip");
        assert!(state.claims.checking_reflector);
        assert!(state.blocked.show_mature_content);
    }

    #[test]
    fn test_error_queue() {
        let notice = ErrorNotice {
            message: "boom".to_string(),
            cause: None,
        };
        let state = reduce(AppState::default(), &Action::Error(notice.clone()));
        assert_eq!(state.errors, vec![notice]);

        let state = reduce(state, &Action::DismissError);
        assert!(state.errors.is_empty());

        let state = reduce(state, &Action::DismissError);
        assert!(state.errors.is_empty());
    }

    #[tokio::test]
    async fn test_store_dispatch_and_select() {
        let store = Store::new();
        store.dispatch(Action::PublishStart).await;
        assert!(store.select(|s| s.publish.form.publishing).await);

        store
            .dispatch_batch(vec![Action::PublishFail, Action::SearchStart])
            .await;
        let snapshot = store.snapshot().await;
        assert!(!snapshot.publish.form.publishing);
        assert!(snapshot.search.searching);
    }

    #[tokio::test]
    async fn test_concurrent_dispatches_are_serialized() {
        let store = Store::new();
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .dispatch(Action::ToggleMuteChannel {
                        uri: format!("lbry://@chan{}", i),
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let muted = store.select(|s| s.blocked.muted_channels.len()).await;
        assert_eq!(muted, 20);
    }

    #[tokio::test]
    async fn test_dispatch_when_checks_predicate() {
        let store = Store::new();
        let first = store
            .dispatch_when(
                |s| !s.claims.checking_reflector,
                Action::ToggleCheckingReflecting(true),
            )
            .await;
        let second = store
            .dispatch_when(
                |s| !s.claims.checking_reflector,
                Action::ToggleCheckingReflecting(true),
            )
            .await;

        assert!(first);
        assert!(!second);
        assert!(store.select(|s| s.claims.checking_reflector).await);
    }
}
