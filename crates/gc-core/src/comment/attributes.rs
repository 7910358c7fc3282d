//! Per-comment privacy flag and grade, kept in host comment metadata

use super::store::CommentStore;
use crate::types::CommentId;
use serde::Serialize;

/// Metadata key of the private flag
pub const META_IS_PRIVATE: &str = "is_private";

/// Metadata key of the grade
pub const META_GRADE: &str = "grade";

/// Stored value of a set private flag
pub const PRIVATE_FLAG: &str = "1";

/// Whether a submitted or stored value counts as set.
///
/// Empty strings and `"0"` are unset, matching how the host treats form fields.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "0")
}

/// Both attributes of one comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentAttributes {
    pub is_private: bool,
    pub grade: Option<String>,
}

impl CommentAttributes {
    /// True if the comment carries either attribute
    pub fn is_protected(&self) -> bool {
        self.is_private || self.grade.is_some()
    }
}

/// Typed view over the host's metadata for the two attributes
#[derive(Clone, Copy)]
pub struct AttributeStore<'a> {
    store: &'a dyn CommentStore,
}

impl<'a> AttributeStore<'a> {
    pub fn new(store: &'a dyn CommentStore) -> Self {
        Self { store }
    }

    pub fn is_private(&self, id: CommentId) -> bool {
        is_truthy(self.store.comment_meta(id, META_IS_PRIVATE).as_deref())
    }

    /// The grade, if one was recorded and is non-empty
    pub fn grade(&self, id: CommentId) -> Option<String> {
        self.store
            .comment_meta(id, META_GRADE)
            .filter(|g| !g.is_empty())
    }

    pub fn get(&self, id: CommentId) -> CommentAttributes {
        CommentAttributes {
            is_private: self.is_private(id),
            grade: self.grade(id),
        }
    }

    /// Set the private flag. There is deliberately no way to clear it.
    pub fn mark_private(&self, id: CommentId) -> bool {
        self.store.update_comment_meta(id, META_IS_PRIVATE, PRIVATE_FLAG)
    }

    /// Record a grade, replacing any earlier one
    pub fn set_grade(&self, id: CommentId, grade: &str) -> bool {
        self.store.update_comment_meta(id, META_GRADE, grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::memory::InMemoryStore;
    use crate::comment::model::{Comment, Post};
    use crate::types::{PostId, UserId};

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_post(Post::new(5, 7, "Essay")).unwrap();
        store
            .insert_comment(Comment::new(1, PostId(5), UserId(7), "x"))
            .unwrap();
        store
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("on")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_defaults() {
        let store = store();
        let attrs = AttributeStore::new(&store).get(CommentId(1));
        assert_eq!(attrs, CommentAttributes::default());
        assert!(!attrs.is_protected());
    }

    #[test]
    fn test_mark_private_and_grade() {
        let store = store();
        let attrs = AttributeStore::new(&store);

        assert!(attrs.mark_private(CommentId(1)));
        assert!(attrs.set_grade(CommentId(1), "B+"));
        assert!(attrs.set_grade(CommentId(1), "A-"));

        let got = attrs.get(CommentId(1));
        assert!(got.is_private);
        assert_eq!(got.grade.as_deref(), Some("A-"));
        assert_eq!(store.snapshot().meta.len(), 2);
    }

    #[test]
    fn test_zero_is_a_grade() {
        let store = store();
        AttributeStore::new(&store).set_grade(CommentId(1), "0");
        assert_eq!(AttributeStore::new(&store).grade(CommentId(1)).as_deref(), Some("0"));
    }

    #[test]
    fn test_empty_grade_is_absent() {
        let store = store();
        store.update_comment_meta(CommentId(1), META_GRADE, "");
        assert_eq!(AttributeStore::new(&store).grade(CommentId(1)), None);
    }
}
