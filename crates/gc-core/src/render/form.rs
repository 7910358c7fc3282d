//! Grade entry fields added to the comment form

use crate::access::RoleResolver;
use crate::config::GradeConfig;
use crate::submission::{grade_entry_action, NonceVerifier, FIELD_ADD_GRADE, FIELD_GRADE, FIELD_NONCE, FIELD_PRIVATE};
use crate::types::{PostId, RequestContext};
use serde::Serialize;

pub const FORM_NOTE: &str =
    "NOTE: Private response and grade will only be visible to instructors and the post's author.";

/// What the comment form gains for an instructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeEntryForm {
    pub private_field: &'static str,
    pub add_grade_field: &'static str,
    pub grade_field: &'static str,
    /// `maxlength` of the grade input
    pub grade_max_length: Option<usize>,
    pub nonce_field: &'static str,
    /// Token bound to this post and the instructor's session
    pub nonce: String,
    pub note: &'static str,
}

impl GradeEntryForm {
    /// Form defaults hook. Nothing is added for non-instructors.
    pub fn for_request(
        roles: &RoleResolver,
        nonces: &dyn NonceVerifier,
        grades: &GradeConfig,
        ctx: &RequestContext,
        post_id: PostId,
    ) -> Option<Self> {
        if !roles.is_instructor(&ctx.actor) {
            return None;
        }
        Some(Self {
            private_field: FIELD_PRIVATE,
            add_grade_field: FIELD_ADD_GRADE,
            grade_field: FIELD_GRADE,
            grade_max_length: grades.limit(),
            nonce_field: FIELD_NONCE,
            nonce: nonces.create(&grade_entry_action(post_id), ctx.actor.session_token()),
            note: FORM_NOTE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::KeyedNonceVerifier;
    use crate::types::Actor;

    #[test]
    fn test_instructor_gets_fields() {
        let roles = RoleResolver::default();
        let nonces = KeyedNonceVerifier::new("secret", 86_400);
        let ctx = RequestContext::new(
            Actor::user(1)
                .with_capability("manage_options")
                .with_session("s1"),
        );

        let form = GradeEntryForm::for_request(&roles, &nonces, &GradeConfig::default(), &ctx, PostId(5))
            .expect("instructor gets the grade fields");
        assert_eq!(form.grade_max_length, Some(5));
        assert_eq!(form.grade_field, FIELD_GRADE);
        assert!(nonces.verify(&form.nonce, "grade-entry-5", "s1"));
    }

    #[test]
    fn test_reader_gets_nothing() {
        let roles = RoleResolver::default();
        let nonces = KeyedNonceVerifier::new("secret", 86_400);
        let ctx = RequestContext::new(Actor::user(8));

        assert!(GradeEntryForm::for_request(&roles, &nonces, &GradeConfig::default(), &ctx, PostId(5)).is_none());
    }
}
