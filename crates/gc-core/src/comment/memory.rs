//! In-memory host store

use super::index::CommentIndex;
use super::model::{Comment, Post, User};
use super::query::CommentClauses;
use super::store::CommentStore;
use crate::error::{GradeCommentsError, Result};
use crate::types::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One row of the comment metadata table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub comment_id: CommentId,
    pub key: String,
    pub value: String,
}

/// Serializable copy of everything an [`InMemoryStore`] holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub meta: Vec<MetaEntry>,
}

#[derive(Debug, Default)]
struct SiteState {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    meta: BTreeMap<CommentId, BTreeMap<String, String>>,
    index: CommentIndex,
}

/// A complete host in memory: users, posts, comments and comment metadata
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<SiteState>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, validating every record
    pub fn from_snapshot(snapshot: SiteSnapshot) -> Result<Self> {
        let store = Self::new();
        for user in snapshot.users {
            store.add_user(user)?;
        }
        for post in snapshot.posts {
            store.add_post(post)?;
        }

        // Parents must exist before their replies
        let mut comments = snapshot.comments;
        comments.sort_by_key(|c| c.id);
        for comment in comments {
            store.insert_comment(comment)?;
        }

        for entry in snapshot.meta {
            if !store.update_comment_meta(entry.comment_id, &entry.key, &entry.value) {
                return Err(GradeCommentsError::CommentNotFound(entry.comment_id.0)
                    .with_context("Metadata refers to a missing comment"));
            }
        }
        Ok(store)
    }

    /// Copy the current state out
    pub fn snapshot(&self) -> SiteSnapshot {
        let state = self.read();
        SiteSnapshot {
            users: state.users.values().cloned().collect(),
            posts: state.posts.values().cloned().collect(),
            comments: state.comments.values().cloned().collect(),
            meta: state
                .meta
                .iter()
                .flat_map(|(id, entries)| {
                    entries.iter().map(move |(key, value)| MetaEntry {
                        comment_id: *id,
                        key: key.clone(),
                        value: value.clone(),
                    })
                })
                .collect(),
        }
    }

    /// Register a user
    pub fn add_user(&self, user: User) -> Result<()> {
        let mut state = self.write();
        if state.users.contains_key(&user.id) {
            return Err(GradeCommentsError::Validation(format!(
                "User with ID {} already exists",
                user.id
            )));
        }
        if user.id.is_anonymous() {
            return Err(GradeCommentsError::Validation(
                "User ID 0 is reserved for anonymous visitors".to_string(),
            ));
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    /// Look up a user
    pub fn user(&self, id: UserId) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    /// Add a post
    pub fn add_post(&self, post: Post) -> Result<()> {
        let mut state = self.write();
        if state.posts.contains_key(&post.id) {
            return Err(GradeCommentsError::Validation(format!(
                "Post with ID {} already exists",
                post.id
            )));
        }
        state.posts.insert(post.id, post);
        Ok(())
    }

    /// All posts, by ID
    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.values().cloned().collect()
    }

    /// Store a new comment. The post must exist, and a parent must be on the same post.
    pub fn insert_comment(&self, comment: Comment) -> Result<CommentId> {
        let mut state = self.write();
        let id = comment.id;

        if state.comments.contains_key(&id) {
            return Err(GradeCommentsError::Validation(format!(
                "Comment with ID {} already exists",
                id
            )));
        }
        if !state.posts.contains_key(&comment.post_id) {
            return Err(GradeCommentsError::PostNotFound(comment.post_id.0));
        }
        if let Some(parent_id) = comment.parent {
            let parent = state
                .comments
                .get(&parent_id)
                .ok_or(GradeCommentsError::CommentNotFound(parent_id.0))?;
            if parent.post_id != comment.post_id {
                return Err(GradeCommentsError::Validation(format!(
                    "Parent comment {} belongs to another post",
                    parent_id
                )));
            }
        }

        state.index.add(&comment);
        state.comments.insert(id, comment);
        Ok(id)
    }

    /// Next free comment ID, one past the highest in use
    pub fn next_comment_id(&self) -> Result<CommentId> {
        let state = self.read();
        let last = state.comments.keys().next_back().map(|id| id.0);
        next_id(last, "comment").map(CommentId)
    }

    /// Next free post ID, one past the highest in use
    pub fn next_post_id(&self) -> Result<PostId> {
        let state = self.read();
        let last = state.posts.keys().next_back().map(|id| id.0);
        next_id(last, "post").map(PostId)
    }

    /// Raw stored comment count for a post
    pub fn stored_count(&self, post_id: PostId) -> usize {
        self.read().index.post_comment_count(post_id)
    }

    fn read(&self) -> RwLockReadGuard<'_, SiteState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SiteState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_id(last: Option<u64>, kind: &str) -> Result<u64> {
    match last {
        None => Ok(1),
        Some(last) => last.checked_add(1).ok_or_else(|| {
            GradeCommentsError::Validation(format!(
                "No {} ID left after {}; pass one explicitly",
                kind, last
            ))
        }),
    }
}

impl CommentStore for InMemoryStore {
    fn post(&self, id: PostId) -> Option<Post> {
        self.read().posts.get(&id).cloned()
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        self.read().comments.get(&id).cloned()
    }

    fn comment_meta(&self, id: CommentId, key: &str) -> Option<String> {
        self.read().meta.get(&id).and_then(|m| m.get(key)).cloned()
    }

    fn update_comment_meta(&self, id: CommentId, key: &str, value: &str) -> bool {
        let mut state = self.write();
        if !state.comments.contains_key(&id) {
            return false;
        }
        let old = state
            .meta
            .entry(id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        state.index.set_meta(id, key, old.as_deref(), value);
        true
    }

    fn query(&self, clauses: &CommentClauses) -> Vec<Comment> {
        let state = self.read();

        let candidates: Vec<CommentId> = if let Some((key, value)) = clauses.meta_condition() {
            state.index.get_by_meta(key, value).into_iter().collect()
        } else if let Some(post_id) = clauses.post_scope() {
            state.index.get_by_post(post_id).into_iter().collect()
        } else {
            state.comments.keys().copied().collect()
        };

        let mut results: Vec<Comment> = candidates
            .iter()
            .filter_map(|id| state.comments.get(id))
            .filter(|comment| {
                let meta = state.meta.get(&comment.id);
                clauses.matches(comment, |key| meta.and_then(|m| m.get(key)).map(String::as_str))
            })
            .cloned()
            .collect();

        results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        results
    }
}
