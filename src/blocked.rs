/// Block, mute and content-policy state
use crate::comments::geo::{GeoBlockLists, Locale};
use crate::store::{Action, AppState};
use std::collections::HashSet;

/// Toggle `uri` in a list, keeping the list free of duplicates
fn toggle(list: &mut Vec<String>, uri: &str) {
    if let Some(pos) = list.iter().position(|x| x == uri) {
        list.remove(pos);
    } else {
        list.push(uri.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockedState {
    /// Channel URIs on the viewer's personal block list
    pub personal_block_list: Vec<String>,
    pub muted_channels: Vec<String>,
    /// `txid:nout` outpoints removed platform-wide
    pub blacklisted_outpoints: HashSet<String>,
    /// `txid:nout` outpoints hidden from listings
    pub filtered_outpoints: HashSet<String>,
    pub geo_block_list: Option<GeoBlockLists>,
    pub locale: Option<Locale>,
    pub show_mature_content: bool,
}

impl BlockedState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ToggleMuteChannel { uri } => toggle(&mut self.muted_channels, uri),
            Action::ToggleBlockChannel { uri } => toggle(&mut self.personal_block_list, uri),
            Action::SetBlacklisted { outpoints } => {
                self.blacklisted_outpoints = outpoints.iter().cloned().collect();
            }
            Action::SetFiltered { outpoints } => {
                self.filtered_outpoints = outpoints.iter().cloned().collect();
            }
            Action::SetGeoBlockList(lists) => self.geo_block_list = Some(lists.clone()),
            Action::SetLocale(locale) => self.locale = Some(locale.clone()),
            Action::SetShowMatureContent(show) => self.show_mature_content = *show,
            _ => {}
        }
    }
}

pub fn channel_is_blocked(state: &AppState, uri: &str) -> bool {
    state.blocked.personal_block_list.iter().any(|u| u == uri)
}

pub fn channel_is_muted(state: &AppState, uri: &str) -> bool {
    state.blocked.muted_channels.iter().any(|u| u == uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::reduce;

    #[test]
    fn test_mute_is_a_toggle() {
        let uri = "lbry://@loud#1";
        let mute = Action::ToggleMuteChannel {
            uri: uri.to_string(),
        };

        let state = reduce(AppState::default(), &mute);
        assert!(channel_is_muted(&state, uri));

        let state = reduce(state, &mute);
        assert!(!channel_is_muted(&state, uri));
    }

    #[test]
    fn test_block_list_toggle() {
        let uri = "lbry://@troll#2";
        let state = reduce(
            AppState::default(),
            &Action::ToggleBlockChannel {
                uri: uri.to_string(),
            },
        );
        assert!(channel_is_blocked(&state, uri));
        assert!(!channel_is_muted(&state, uri));
    }

    #[test]
    fn test_outpoint_maps_replace() {
        let mut state = BlockedState::default();
        state.apply(&Action::SetBlacklisted {
            outpoints: vec!["a:0".to_string(), "b:1".to_string()],
        });
        state.apply(&Action::SetBlacklisted {
            outpoints: vec!["c:2".to_string()],
        });
        assert_eq!(state.blacklisted_outpoints.len(), 1);
        assert!(state.blacklisted_outpoints.contains("c:2"));
    }
}
