//! Edit protection for graded and private comments

use super::roles::RoleResolver;
use crate::comment::{AttributeStore, CommentStore};
use crate::types::{Actor, CommentId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Meta capability checked before a comment is edited
pub const EDIT_COMMENT: &str = "edit_comment";

/// Primitive capability nobody holds
pub const DO_NOT_ALLOW: &str = "do_not_allow";

/// Primitive capabilities a meta capability maps to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCaps(pub Vec<String>);

impl RequiredCaps {
    pub fn new(caps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(caps.into_iter().map(Into::into).collect())
    }

    /// A set no actor can satisfy
    pub fn deny() -> Self {
        Self(vec![DO_NOT_ALLOW.to_string()])
    }

    pub fn is_denied(&self) -> bool {
        self.0.iter().any(|c| c == DO_NOT_ALLOW)
    }

    /// Whether `actor` holds every required capability
    pub fn satisfied_by(&self, actor: &Actor) -> bool {
        !self.is_denied() && self.0.iter().all(|c| actor.has_capability(c))
    }
}

/// Denies `edit_comment` on protected comments to everyone but instructors
#[derive(Clone, Copy)]
pub struct EditGuard<'a> {
    store: &'a dyn CommentStore,
    roles: &'a RoleResolver,
}

impl<'a> EditGuard<'a> {
    pub fn new(store: &'a dyn CommentStore, roles: &'a RoleResolver) -> Self {
        Self { store, roles }
    }

    /// Capability-mapping hook. Anything but a non-instructor editing a
    /// private or graded comment passes through unchanged.
    pub fn filter_edit_capability(
        &self,
        caps: RequiredCaps,
        requested: &str,
        actor: &Actor,
        target: Option<CommentId>,
    ) -> RequiredCaps {
        if requested != EDIT_COMMENT || self.roles.is_instructor(actor) {
            return caps;
        }
        let Some(comment_id) = target else {
            return caps;
        };

        if AttributeStore::new(self.store).get(comment_id).is_protected() {
            debug!(actor = %actor.id, comment = %comment_id, "Denying edit of protected comment");
            return RequiredCaps::deny();
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{Comment, InMemoryStore, Post};
    use crate::types::{PostId, UserId};

    fn fixture() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_post(Post::new(5, 7, "Essay")).unwrap();
        for id in 1..=3 {
            store
                .insert_comment(Comment::new(id, PostId(5), UserId(7), "text"))
                .unwrap();
        }
        let attrs = AttributeStore::new(&store);
        attrs.mark_private(CommentId(1));
        attrs.set_grade(CommentId(2), "B");
        store
    }

    fn default_caps() -> RequiredCaps {
        RequiredCaps::new(["edit_posts"])
    }

    #[test]
    fn test_student_denied_on_graded_public_comment() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);

        let caps = guard.filter_edit_capability(default_caps(), EDIT_COMMENT, &Actor::user(7), Some(CommentId(2)));
        assert!(caps.is_denied());
    }

    #[test]
    fn test_student_denied_on_private_comment() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);

        let caps = guard.filter_edit_capability(default_caps(), EDIT_COMMENT, &Actor::user(7), Some(CommentId(1)));
        assert_eq!(caps, RequiredCaps::deny());
    }

    #[test]
    fn test_plain_comment_passes_through() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);

        let caps = guard.filter_edit_capability(default_caps(), EDIT_COMMENT, &Actor::user(7), Some(CommentId(3)));
        assert_eq!(caps, default_caps());
    }

    #[test]
    fn test_instructor_passes_through() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);
        let prof = Actor::user(1).with_capability("manage_options");

        let caps = guard.filter_edit_capability(default_caps(), EDIT_COMMENT, &prof, Some(CommentId(1)));
        assert_eq!(caps, default_caps());
    }

    #[test]
    fn test_other_capabilities_untouched() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);

        let caps = guard.filter_edit_capability(default_caps(), "delete_post", &Actor::user(7), Some(CommentId(1)));
        assert_eq!(caps, default_caps());
    }

    #[test]
    fn test_missing_target_passes_through() {
        let store = fixture();
        let roles = RoleResolver::default();
        let guard = EditGuard::new(&store, &roles);

        let caps = guard.filter_edit_capability(default_caps(), EDIT_COMMENT, &Actor::user(7), None);
        assert_eq!(caps, default_caps());
    }

    #[test]
    fn test_satisfied_by() {
        let actor = Actor::user(7).with_capability("edit_posts");
        assert!(default_caps().satisfied_by(&actor));
        assert!(!RequiredCaps::deny().satisfied_by(&actor.clone().with_capability(DO_NOT_ALLOW)));
    }
}
