//! Host comment storage abstraction

use super::model::{Comment, Post};
use super::query::CommentClauses;
use crate::types::{CommentId, PostId};

/// The slice of the host platform the hooks read and write.
///
/// Queries issued through this trait are *raw*: no visibility hook runs on
/// them. Viewer-scoped listings go through
/// [`GradeComments::list_comments`](crate::plugin::GradeComments::list_comments).
pub trait CommentStore: Send + Sync {
    /// Look up a post
    fn post(&self, id: PostId) -> Option<Post>;

    /// Look up a comment
    fn comment(&self, id: CommentId) -> Option<Comment>;

    /// Read a single metadata value
    fn comment_meta(&self, id: CommentId, key: &str) -> Option<String>;

    /// Insert or overwrite a metadata value. Returns `false` if the comment does not exist.
    fn update_comment_meta(&self, id: CommentId, key: &str, value: &str) -> bool;

    /// Comments matching the clauses, oldest first
    fn query(&self, clauses: &CommentClauses) -> Vec<Comment>;

    /// Number of comments matching the clauses
    fn count(&self, clauses: &CommentClauses) -> usize {
        self.query(clauses).len()
    }
}
