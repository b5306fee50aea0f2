/// Comments state slice
use super::Comment;
use crate::store::Action;
use std::collections::HashMap;

fn push_unique(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|x| x == id) {
        list.push(id.to_string());
    }
}

/// Comment records plus id lists per claim and parent.
///
/// Id lists are never pruned by moderation; a removed comment only leaves
/// `comment_by_id`, so lookups through the lists yield nothing for it.
#[derive(Debug, Clone, Default)]
pub struct CommentsState {
    pub comment_by_id: HashMap<String, Comment>,
    /// Claim id -> every loaded comment id
    pub by_id: HashMap<String, Vec<String>>,
    pub top_level_by_id: HashMap<String, Vec<String>>,
    pub replies_by_parent_id: HashMap<String, Vec<String>>,
    pub pinned_by_id: HashMap<String, Vec<String>>,
    pub total_by_id: HashMap<String, usize>,
    pub top_level_total_pages_by_id: HashMap<String, usize>,
    pub replies_total_pages_by_parent_id: HashMap<String, usize>,
}

impl CommentsState {
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::CommentListCompleted {
                claim_id,
                parent_id,
                comments,
                total_items,
                total_filtered_items: _,
                total_pages,
            } => {
                for comment in comments {
                    let id = comment.comment_id.as_str();
                    push_unique(self.by_id.entry(claim_id.clone()).or_default(), id);

                    match parent_id {
                        Some(parent) => {
                            push_unique(
                                self.replies_by_parent_id.entry(parent.clone()).or_default(),
                                id,
                            );
                        }
                        None => {
                            push_unique(
                                self.top_level_by_id.entry(claim_id.clone()).or_default(),
                                id,
                            );
                            if comment.is_pinned {
                                push_unique(
                                    self.pinned_by_id.entry(claim_id.clone()).or_default(),
                                    id,
                                );
                            }
                        }
                    }

                    self.comment_by_id.insert(id.to_string(), comment.clone());
                }

                match parent_id {
                    Some(parent) => {
                        self.replies_total_pages_by_parent_id
                            .insert(parent.clone(), *total_pages);
                    }
                    None => {
                        self.total_by_id.insert(claim_id.clone(), *total_items);
                        self.top_level_total_pages_by_id
                            .insert(claim_id.clone(), *total_pages);
                    }
                }
            }
            Action::CommentCreateCompleted { claim_id, comment } => {
                let id = comment.comment_id.clone();

                let all = self.by_id.entry(claim_id.clone()).or_default();
                if !all.contains(&id) {
                    all.insert(0, id.clone());
                }

                match &comment.parent_id {
                    Some(parent) => {
                        push_unique(
                            self.replies_by_parent_id.entry(parent.clone()).or_default(),
                            &id,
                        );
                        if let Some(parent_comment) = self.comment_by_id.get_mut(parent) {
                            parent_comment.replies += 1;
                        }
                    }
                    None => {
                        let top = self.top_level_by_id.entry(claim_id.clone()).or_default();
                        if !top.contains(&id) {
                            top.insert(0, id.clone());
                        }
                    }
                }

                *self.total_by_id.entry(claim_id.clone()).or_insert(0) += 1;
                self.comment_by_id.insert(id, comment.clone());
            }
            Action::CommentModerationRemoved { comment_id } => {
                self.comment_by_id.remove(comment_id);
            }
            Action::CommentPinCompleted {
                claim_id,
                comment_id,
                unpin,
            } => {
                if let Some(comment) = self.comment_by_id.get_mut(comment_id) {
                    comment.is_pinned = !*unpin;
                }

                let pinned = self.pinned_by_id.entry(claim_id.clone()).or_default();
                if *unpin {
                    pinned.retain(|id| id != comment_id);
                } else {
                    // Only one pinned comment per claim
                    pinned.clear();
                    pinned.push(comment_id.clone());
                }
            }
            _ => {}
        }
    }
}
