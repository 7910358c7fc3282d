//! Comment indexing for fast lookup

use super::model::Comment;
use crate::types::{CommentId, PostId};
use std::collections::{BTreeSet, HashMap};

/// Multi-dimensional index for comments
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    /// Index by post
    by_post: HashMap<PostId, BTreeSet<CommentId>>,
    /// Index by metadata `(key, value)`
    by_meta: HashMap<(String, String), BTreeSet<CommentId>>,
}

impl CommentIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        self.by_post
            .entry(comment.post_id)
            .or_default()
            .insert(comment.id);
    }

    /// Record a metadata value, replacing any previous value for the key
    pub fn set_meta(&mut self, id: CommentId, key: &str, old: Option<&str>, new: &str) {
        if let Some(old) = old {
            let slot = (key.to_string(), old.to_string());
            if let Some(ids) = self.by_meta.get_mut(&slot) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.by_meta.remove(&slot);
                }
            }
        }
        self.by_meta
            .entry((key.to_string(), new.to_string()))
            .or_default()
            .insert(id);
    }

    /// Get comments on a post
    pub fn get_by_post(&self, post_id: PostId) -> BTreeSet<CommentId> {
        self.by_post.get(&post_id).cloned().unwrap_or_default()
    }

    /// Get comments carrying `key = value`
    pub fn get_by_meta(&self, key: &str, value: &str) -> BTreeSet<CommentId> {
        self.by_meta
            .get(&(key.to_string(), value.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Get comment count for a post
    pub fn post_comment_count(&self, post_id: PostId) -> usize {
        self.by_post.get(&post_id).map(|ids| ids.len()).unwrap_or(0)
    }
}
