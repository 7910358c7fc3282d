//! Instructor and post-author resolution

use crate::comment::CommentStore;
use crate::config::RolesConfig;
use crate::types::{Actor, PostId, RequestContext, UserId};
use std::collections::BTreeSet;

/// Override point for the instructor decision.
///
/// Receives the capability-based default and returns the final answer.
pub trait InstructorPolicy: Send + Sync {
    fn is_instructor(&self, actor: &Actor, default: bool) -> bool;
}

impl<F> InstructorPolicy for F
where
    F: Fn(&Actor, bool) -> bool + Send + Sync,
{
    fn is_instructor(&self, actor: &Actor, default: bool) -> bool {
        self(actor, default)
    }
}

/// Keeps the capability-based default
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityPolicy;

impl InstructorPolicy for CapabilityPolicy {
    fn is_instructor(&self, _actor: &Actor, default: bool) -> bool {
        default
    }
}

/// Promotes a fixed set of users on top of the capability default
#[derive(Debug, Clone, Default)]
pub struct ConfiguredInstructors {
    users: BTreeSet<UserId>,
}

impl ConfiguredInstructors {
    pub fn new(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }
}

impl InstructorPolicy for ConfiguredInstructors {
    fn is_instructor(&self, actor: &Actor, default: bool) -> bool {
        default || (actor.is_logged_in() && self.users.contains(&actor.id))
    }
}

/// Decides who is an instructor and who authored a post
pub struct RoleResolver {
    capability: String,
    policy: Box<dyn InstructorPolicy>,
}

impl RoleResolver {
    /// Resolver checking `capability`, with no override
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            policy: Box::new(CapabilityPolicy),
        }
    }

    /// Resolver built from the `[roles]` configuration section
    pub fn from_config(config: &RolesConfig) -> Self {
        let resolver = Self::new(config.instructor_capability.clone());
        if config.instructors.is_empty() {
            resolver
        } else {
            resolver.with_policy(ConfiguredInstructors::new(
                config.instructors.iter().map(|id| UserId(*id)),
            ))
        }
    }

    /// Replace the override policy
    pub fn with_policy(mut self, policy: impl InstructorPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Capability checked for the default decision
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Evaluated on every call; capabilities may change within a request.
    pub fn is_instructor(&self, actor: &Actor) -> bool {
        let default = actor.has_capability(&self.capability);
        self.policy.is_instructor(actor, default)
    }

    /// True if the actor is logged in and wrote the post.
    ///
    /// The post is `post_id` if given, else the request's queried post. No
    /// resolvable post means "not the author".
    pub fn is_author(
        &self,
        store: &dyn CommentStore,
        ctx: &RequestContext,
        post_id: Option<PostId>,
    ) -> bool {
        let Some(post) = post_id.or(ctx.queried_post).and_then(|id| store.post(id)) else {
            return false;
        };
        ctx.actor.is_logged_in() && ctx.actor.id == post.author
    }
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INSTRUCTOR_CAPABILITY)
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{InMemoryStore, Post};

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_post(Post::new(5, 7, "Essay")).unwrap();
        store
    }

    #[test]
    fn test_instructor_by_capability() {
        let roles = RoleResolver::default();
        assert!(roles.is_instructor(&Actor::user(1).with_capability("manage_options")));
        assert!(!roles.is_instructor(&Actor::user(1)));
        assert!(!roles.is_instructor(&Actor::anonymous()));
    }

    #[test]
    fn test_policy_can_revoke() {
        let roles = RoleResolver::default().with_policy(|_: &Actor, _default: bool| false);
        assert!(!roles.is_instructor(&Actor::user(1).with_capability("manage_options")));
    }

    #[test]
    fn test_configured_instructors() {
        let config = RolesConfig {
            instructor_capability: "moderate_comments".to_string(),
            instructors: vec![4],
        };
        let roles = RoleResolver::from_config(&config);
        assert!(roles.is_instructor(&Actor::user(4)));
        assert!(roles.is_instructor(&Actor::user(2).with_capability("moderate_comments")));
        assert!(!roles.is_instructor(&Actor::user(2).with_capability("manage_options")));
    }

    #[test]
    fn test_capability_change_is_seen_immediately() {
        let roles = RoleResolver::default();
        let mut actor = Actor::user(1);
        assert!(!roles.is_instructor(&actor));
        actor.capabilities.insert("manage_options".to_string());
        assert!(roles.is_instructor(&actor));
    }

    #[test]
    fn test_is_author_explicit_post() {
        let store = store();
        let roles = RoleResolver::default();
        let ctx = RequestContext::new(Actor::user(7));
        assert!(roles.is_author(&store, &ctx, Some(PostId(5))));
        assert!(!roles.is_author(&store, &RequestContext::new(Actor::user(8)), Some(PostId(5))));
    }

    #[test]
    fn test_is_author_falls_back_to_queried_post() {
        let store = store();
        let roles = RoleResolver::default();
        let ctx = RequestContext::new(Actor::user(7)).on_post(PostId(5));
        assert!(roles.is_author(&store, &ctx, None));
    }

    #[test]
    fn test_is_author_without_post_is_false() {
        let store = store();
        let roles = RoleResolver::default();
        let ctx = RequestContext::new(Actor::user(7));
        assert!(!roles.is_author(&store, &ctx, None));
        assert!(!roles.is_author(&store, &ctx, Some(PostId(404))));
    }

    #[test]
    fn test_anonymous_never_authors() {
        let store = InMemoryStore::new();
        store.add_post(Post::new(1, 0, "Orphaned")).unwrap();
        let roles = RoleResolver::default();
        let ctx = RequestContext::new(Actor::anonymous());
        assert!(!roles.is_author(&store, &ctx, Some(PostId(1))));
    }
}
