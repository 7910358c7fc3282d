//! Core type definitions for grade-comments

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a comment in the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a post in the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user. `0` is reserved for anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub const ANONYMOUS: Self = UserId(0);

    /// Check if this is the anonymous user
    pub fn is_anonymous(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user on whose behalf a hook runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID (anonymous when zero)
    pub id: UserId,
    /// Capabilities held by the user
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Login session token, used to bind anti-forgery tokens
    #[serde(default)]
    pub session: Option<String>,
}

impl Actor {
    /// An anonymous visitor with no capabilities
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in user
    pub fn user(id: u64) -> Self {
        Self {
            id: UserId(id),
            capabilities: BTreeSet::new(),
            session: None,
        }
    }

    /// Grant a capability
    pub fn with_capability(mut self, cap: impl Into<String>) -> Self {
        self.capabilities.insert(cap.into());
        self
    }

    /// Attach a login session token
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn is_logged_in(&self) -> bool {
        !self.id.is_anonymous()
    }

    pub fn has_capability(&self, cap: &str) -> bool {
        self.capabilities.contains(cap)
    }

    /// Session token, empty for visitors without a session
    pub fn session_token(&self) -> &str {
        self.session.as_deref().unwrap_or("")
    }
}

/// Which screen a comment is being rendered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Public-facing post and comment pages
    #[default]
    Front,
    /// The raw administrative comment listing; grades have their own column there
    AdminCommentList,
}

/// Request-scoped state the host would otherwise keep in globals
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Acting user
    pub actor: Actor,
    /// The post the request is about, if any
    pub queried_post: Option<PostId>,
    /// Rendering screen
    pub screen: Screen,
}

impl RequestContext {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            queried_post: None,
            screen: Screen::Front,
        }
    }

    pub fn on_post(mut self, post_id: PostId) -> Self {
        self.queried_post = Some(post_id);
        self
    }

    pub fn on_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }
}
