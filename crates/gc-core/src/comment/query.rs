//! Comment query clauses
//!
//! A listing query is a conjunction of [`Condition`]s. Hooks receive the
//! base clauses and may append conditions; the store evaluates the result.

use super::model::{Comment, CommentStatus};
use crate::types::{CommentId, PostId};
use std::collections::BTreeSet;
use std::fmt;

/// Which moderation statuses a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Approved comments only
    #[default]
    Approved,
    /// A single status
    Only(CommentStatus),
    /// Every status
    Any,
}

/// A single predicate on a comment row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Comment belongs to the post
    PostIs(PostId),
    /// Comment has the given status
    StatusIs(CommentStatus),
    /// Comment carries a metadata entry with exactly this value
    MetaEquals { key: String, value: String },
    /// Comment ID is not in the set
    IdNotIn(BTreeSet<CommentId>),
}

impl Condition {
    /// Evaluate against a comment; `meta` resolves metadata for that comment
    pub fn matches<'a>(&self, comment: &Comment, meta: impl Fn(&str) -> Option<&'a str>) -> bool {
        match self {
            Condition::PostIs(post_id) => comment.post_id == *post_id,
            Condition::StatusIs(status) => comment.status == *status,
            Condition::MetaEquals { key, value } => meta(key) == Some(value.as_str()),
            Condition::IdNotIn(ids) => !ids.contains(&comment.id),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::PostIs(post_id) => write!(f, "comment_post_ID = {}", post_id),
            Condition::StatusIs(status) => write!(f, "comment_status = '{}'", status),
            Condition::MetaEquals { key, value } => {
                write!(f, "meta('{}') = '{}'", key, value.replace('\'', "''"))
            }
            Condition::IdNotIn(ids) => {
                let list: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "comment_ID NOT IN ({})", list.join(","))
            }
        }
    }
}

/// The filter part of a comment query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentClauses {
    pub conditions: Vec<Condition>,
}

impl CommentClauses {
    /// Clauses matching every comment
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Exclude a set of comments. An empty set leaves the clauses untouched.
    pub fn exclude(mut self, ids: BTreeSet<CommentId>) -> Self {
        if !ids.is_empty() {
            self.conditions.push(Condition::IdNotIn(ids));
        }
        self
    }

    /// All comment IDs excluded by `IdNotIn` conditions
    pub fn excluded_ids(&self) -> BTreeSet<CommentId> {
        self.conditions
            .iter()
            .filter_map(|c| match c {
                Condition::IdNotIn(ids) => Some(ids.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Post scope, if the clauses name one
    pub fn post_scope(&self) -> Option<PostId> {
        self.conditions.iter().find_map(|c| match c {
            Condition::PostIs(post_id) => Some(*post_id),
            _ => None,
        })
    }

    /// Meta condition the store may serve from its index
    pub fn meta_condition(&self) -> Option<(&str, &str)> {
        self.conditions.iter().find_map(|c| match c {
            Condition::MetaEquals { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    pub fn matches<'a>(&self, comment: &Comment, meta: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.conditions.iter().all(|c| c.matches(comment, &meta))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl fmt::Display for CommentClauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "1=1");
        }
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

/// High-level description of a comment listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentQuery {
    /// Restrict to one post
    pub post_id: Option<PostId>,
    /// Restrict to comments carrying `key = value` metadata
    pub meta: Option<(String, String)>,
    pub status: StatusFilter,
}

impl CommentQuery {
    /// Approved comments on every post
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_post(post_id: PostId) -> Self {
        Self {
            post_id: Some(post_id),
            ..Self::default()
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta = Some((key.into(), value.into()));
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Translate into base clauses, before any hook runs
    pub fn clauses(&self) -> CommentClauses {
        let mut clauses = CommentClauses::new();
        if let Some(post_id) = self.post_id {
            clauses = clauses.and(Condition::PostIs(post_id));
        }
        match self.status {
            StatusFilter::Approved => {
                clauses = clauses.and(Condition::StatusIs(CommentStatus::Approved));
            }
            StatusFilter::Only(status) => clauses = clauses.and(Condition::StatusIs(status)),
            StatusFilter::Any => {}
        }
        if let Some((key, value)) = &self.meta {
            clauses = clauses.and(Condition::MetaEquals {
                key: key.clone(),
                value: value.clone(),
            });
        }
        clauses
    }
}
