//! Host platform records: users, posts and comments

use crate::types::{Actor, CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered user of the host platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login name
    pub login: String,
    /// Capabilities granted to the user
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl User {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            login: login.into(),
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_capability(mut self, cap: impl Into<String>) -> Self {
        self.capabilities.insert(cap.into());
        self
    }

    /// Build the acting identity for a request made by this user
    pub fn to_actor(&self) -> Actor {
        Actor {
            id: self.id,
            capabilities: self.capabilities.clone(),
            session: None,
        }
    }
}

/// A blog post comments attach to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Recorded author of the post
    pub author: UserId,
    pub title: String,
}

impl Post {
    pub fn new(id: u64, author: u64, title: impl Into<String>) -> Self {
        Self {
            id: PostId(id),
            author: UserId(author),
            title: title.into(),
        }
    }
}

/// Moderation status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Approved,
    Pending,
    Spam,
    Trash,
}

impl CommentStatus {
    /// Parse from the lowercase name
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "approved" | "approve" => Some(CommentStatus::Approved),
            "pending" | "hold" => Some(CommentStatus::Pending),
            "spam" => Some(CommentStatus::Spam),
            "trash" => Some(CommentStatus::Trash),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentStatus::Approved => write!(f, "approved"),
            CommentStatus::Pending => write!(f, "pending"),
            CommentStatus::Spam => write!(f, "spam"),
            CommentStatus::Trash => write!(f, "trash"),
        }
    }
}

/// A comment as stored by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Parent comment for replies
    #[serde(default)]
    pub parent: Option<CommentId>,
    /// Authoring user, anonymous when zero
    #[serde(default)]
    pub user_id: UserId,
    /// Post the comment belongs to
    pub post_id: PostId,
    /// Display name given by the commenter
    #[serde(default)]
    pub author_name: String,
    /// Comment body
    pub content: String,
    #[serde(default)]
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create an approved top-level comment
    pub fn new(id: u64, post_id: PostId, user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: CommentId(id),
            parent: None,
            user_id,
            post_id,
            author_name: String::new(),
            content: content.into(),
            status: CommentStatus::Approved,
            created_at: Utc::now(),
        }
    }

    /// Make this comment a reply
    pub fn reply_to(mut self, parent: CommentId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_status(mut self, status: CommentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_creation() {
        let comment = Comment::new(1, PostId(5), UserId(7), "Nice post");
        assert_eq!(comment.id, CommentId(1));
        assert_eq!(comment.status, CommentStatus::Approved);
        assert_eq!(comment.parent, None);
    }

    #[test]
    fn test_reply() {
        let reply = Comment::new(2, PostId(5), UserId::ANONYMOUS, "Thanks").reply_to(CommentId(1));
        assert_eq!(reply.parent, Some(CommentId(1)));
        assert!(reply.user_id.is_anonymous());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(CommentStatus::from_name("hold"), Some(CommentStatus::Pending));
        assert_eq!(CommentStatus::from_name("spam"), Some(CommentStatus::Spam));
        assert_eq!(CommentStatus::from_name("bogus"), None);
        assert_eq!(CommentStatus::Trash.to_string(), "trash");
    }

    #[test]
    fn test_user_to_actor() {
        let user = User::new(3, "prof").with_capability("manage_options");
        let actor = user.to_actor();
        assert_eq!(actor.id, UserId(3));
        assert!(actor.has_capability("manage_options"));
        assert!(actor.session.is_none());
    }

    #[test]
    fn test_comment_serialization() {
        let comment = Comment::new(1, PostId(5), UserId(7), "Body").reply_to(CommentId(9));
        let json = serde_json::to_string(&comment).unwrap();
        let comment2: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(comment, comment2);
    }
}
