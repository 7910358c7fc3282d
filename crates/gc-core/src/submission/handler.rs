//! Persisting privacy and grade when a comment is inserted

use super::nonce::{grade_entry_action, NonceVerifier};
use crate::access::RoleResolver;
use crate::comment::attributes::is_truthy;
use crate::comment::{AttributeStore, Comment, CommentStore};
use crate::config::GradeConfig;
use crate::types::Actor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Form field: "make this comment private" checkbox
pub const FIELD_PRIVATE: &str = "gc-private-comment";
/// Form field: "add a grade" checkbox
pub const FIELD_ADD_GRADE: &str = "gc-add-a-grade";
/// Form field: grade text input
pub const FIELD_GRADE: &str = "gc-grade";
/// Form field: anti-forgery token
pub const FIELD_NONCE: &str = "_gc_nonce";

/// The grading fields of a submitted comment form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedFields {
    #[serde(default, rename = "gc-private-comment")]
    pub private_comment: Option<String>,
    #[serde(default, rename = "gc-add-a-grade")]
    pub add_a_grade: Option<String>,
    #[serde(default, rename = "gc-grade")]
    pub grade: Option<String>,
    #[serde(default, rename = "_gc_nonce")]
    pub nonce: Option<String>,
}

impl SubmittedFields {
    /// Pick the grading fields out of raw form pairs; other fields are ignored
    pub fn from_form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                FIELD_PRIVATE => fields.private_comment = Some(value.into()),
                FIELD_ADD_GRADE => fields.add_a_grade = Some(value.into()),
                FIELD_GRADE => fields.grade = Some(value.into()),
                FIELD_NONCE => fields.nonce = Some(value.into()),
                _ => {}
            }
        }
        fields
    }

    pub fn wants_private(&self) -> bool {
        is_truthy(self.private_comment.as_deref())
    }

    pub fn wants_grade(&self) -> bool {
        is_truthy(self.add_a_grade.as_deref())
    }
}

/// Remove the backslashes the host adds when escaping request data
pub fn unslash(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Writes the private flag and grade for freshly inserted comments
#[derive(Clone, Copy)]
pub struct SubmissionHandler<'a> {
    store: &'a dyn CommentStore,
    roles: &'a RoleResolver,
    nonces: &'a dyn NonceVerifier,
    grades: &'a GradeConfig,
}

impl<'a> SubmissionHandler<'a> {
    pub fn new(
        store: &'a dyn CommentStore,
        roles: &'a RoleResolver,
        nonces: &'a dyn NonceVerifier,
        grades: &'a GradeConfig,
    ) -> Self {
        Self {
            store,
            roles,
            nonces,
            grades,
        }
    }

    /// Insert hook. Never fails; anything not allowed is simply not recorded.
    pub fn on_comment_inserted(&self, comment: &Comment, submitted: &SubmittedFields, actor: &Actor) {
        let attrs = AttributeStore::new(self.store);
        let instructor = self.roles.is_instructor(actor);

        let mut is_private = instructor && submitted.wants_private();
        if !is_private {
            if let Some(parent) = comment.parent {
                if attrs.is_private(parent) {
                    debug!(comment = %comment.id, parent = %parent, "Reply inherits private flag");
                    is_private = true;
                }
            }
        }
        if is_private {
            attrs.mark_private(comment.id);
            info!(comment = %comment.id, "Marked comment private");
        }

        if instructor {
            if let Some(grade) = self.accepted_grade(comment, submitted, actor) {
                attrs.set_grade(comment.id, &grade);
                info!(comment = %comment.id, grade = %grade, "Recorded grade");
            }
        }
    }

    fn accepted_grade(&self, comment: &Comment, submitted: &SubmittedFields, actor: &Actor) -> Option<String> {
        let token = submitted.nonce.as_deref().unwrap_or("");
        let action = grade_entry_action(comment.post_id);
        if !self.nonces.verify(token, &action, actor.session_token()) {
            debug!(comment = %comment.id, "Grade ignored: invalid form token");
            return None;
        }
        if !submitted.wants_grade() {
            return None;
        }

        let grade = unslash(submitted.grade.as_deref().unwrap_or(""));
        if grade.is_empty() {
            return None;
        }
        if let Some(limit) = self.grades.limit() {
            if grade.chars().count() > limit {
                warn!(
                    comment = %comment.id,
                    limit,
                    "Grade ignored: longer than the configured maximum"
                );
                return None;
            }
        }
        Some(grade)
    }
}
