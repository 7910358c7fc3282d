//! Grade and privacy annotations on rendered comments

use crate::access::RoleResolver;
use crate::comment::{AttributeStore, Comment, CommentStore};
use crate::types::{RequestContext, Screen};
use serde::{Deserialize, Serialize};

pub const PRIVATE_LABEL: &str = "(Private)";
pub const GRADE_LABEL: &str = "Grade (Private):";
pub const NOTE_PRIVATE_AND_GRADE: &str =
    "NOTE: Private response and grade are visible only to instructors and to the post's author.";
pub const NOTE_PRIVATE: &str =
    "NOTE: Private response is visible only to instructors and to the post's author.";

/// Escape text for inclusion in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Labels of a comment's reply link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyLinkArgs {
    pub reply_text: String,
    /// `%s` is replaced by the comment author's name
    pub reply_to_text: String,
}

impl Default for ReplyLinkArgs {
    fn default() -> Self {
        Self {
            reply_text: "Reply".to_string(),
            reply_to_text: "Reply to %s".to_string(),
        }
    }
}

/// Adds grade and privacy markup to comment text at render time
#[derive(Clone, Copy)]
pub struct DisplayDecorator<'a> {
    store: &'a dyn CommentStore,
    roles: &'a RoleResolver,
}

impl<'a> DisplayDecorator<'a> {
    pub fn new(store: &'a dyn CommentStore, roles: &'a RoleResolver) -> Self {
        Self { store, roles }
    }

    /// Comment text hook.
    ///
    /// The grade line goes to instructors and the post author, never on the
    /// admin comment list (it has a grade column). The private marker is shown
    /// to anyone who can see the comment at all.
    pub fn decorate(&self, text: &str, comment: &Comment, ctx: &RequestContext) -> String {
        let attrs = AttributeStore::new(self.store);
        let mut out = text.to_string();

        let grade = if ctx.screen != Screen::AdminCommentList && self.may_see_grade(comment, ctx) {
            attrs.grade(comment.id)
        } else {
            None
        };
        if let Some(grade) = &grade {
            out.push_str(&format!(
                "<div class=\"gc-grade-display\"><span class=\"gc-grade-label\">{}</span> {}</div>",
                GRADE_LABEL,
                escape_html(grade)
            ));
        }

        let is_private = attrs.is_private(comment.id);
        if is_private {
            out = format!("<strong class=\"gc-private-notice\">{}</strong> {}", PRIVATE_LABEL, out);
        }

        let note = match (grade.is_some(), is_private) {
            (true, true) => Some(NOTE_PRIVATE_AND_GRADE),
            (false, true) => Some(NOTE_PRIVATE),
            _ => None,
        };
        if let Some(note) = note {
            out.push_str(&format!("<p class=\"gc-privacy-description\">{}</p>", note));
        }

        out
    }

    fn may_see_grade(&self, comment: &Comment, ctx: &RequestContext) -> bool {
        self.roles.is_instructor(&ctx.actor)
            || self.roles.is_author(self.store, ctx, Some(comment.post_id))
    }

    /// Reply link hook: flag replies to private comments in both labels
    pub fn decorate_reply_link(&self, mut args: ReplyLinkArgs, comment: &Comment) -> ReplyLinkArgs {
        if AttributeStore::new(self.store).is_private(comment.id) {
            args.reply_text = format!("{} {}", PRIVATE_LABEL, args.reply_text);
            args.reply_to_text = format!("{} {}", PRIVATE_LABEL, args.reply_to_text);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{InMemoryStore, Post};
    use crate::types::{Actor, CommentId, PostId, UserId};
    use pretty_assertions::assert_eq;

    struct Fixture {
        store: InMemoryStore,
        roles: RoleResolver,
    }

    /// 1: plain, 2: graded, 3: private, 4: private and graded
    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        store.add_post(Post::new(5, 7, "Essay")).unwrap();
        for id in 1..=4 {
            store
                .insert_comment(Comment::new(id, PostId(5), UserId(1), "Body"))
                .unwrap();
        }
        let attrs = AttributeStore::new(&store);
        attrs.set_grade(CommentId(2), "B+");
        attrs.mark_private(CommentId(3));
        attrs.mark_private(CommentId(4));
        attrs.set_grade(CommentId(4), "<A>");
        Fixture {
            store,
            roles: RoleResolver::default(),
        }
    }

    impl Fixture {
        fn render(&self, id: u64, ctx: &RequestContext) -> String {
            let comment = self.store.comment(CommentId(id)).unwrap();
            DisplayDecorator::new(&self.store, &self.roles).decorate(&comment.content, &comment, ctx)
        }
    }

    fn prof() -> RequestContext {
        RequestContext::new(Actor::user(1).with_capability("manage_options"))
    }

    #[test]
    fn test_plain_comment_untouched() {
        let f = fixture();
        assert_eq!(f.render(1, &prof()), "Body");
    }

    #[test]
    fn test_grade_only_has_no_note() {
        let f = fixture();
        let out = f.render(2, &prof());
        assert!(out.starts_with("Body<div class=\"gc-grade-display\">"));
        assert!(out.contains("B+"));
        assert!(!out.contains("NOTE"));
        assert!(!out.contains(PRIVATE_LABEL));
    }

    #[test]
    fn test_private_only() {
        let f = fixture();
        let out = f.render(3, &RequestContext::new(Actor::anonymous()));
        assert_eq!(
            out,
            format!(
                "<strong class=\"gc-private-notice\">(Private)</strong> Body<p class=\"gc-privacy-description\">{}</p>",
                NOTE_PRIVATE
            )
        );
    }

    #[test]
    fn test_private_and_graded_for_instructor() {
        let f = fixture();
        let out = f.render(4, &prof());
        assert!(out.contains("&lt;A&gt;"));
        assert!(out.contains(NOTE_PRIVATE_AND_GRADE));
    }

    #[test]
    fn test_post_author_sees_grade() {
        let f = fixture();
        let out = f.render(2, &RequestContext::new(Actor::user(7)));
        assert!(out.contains("B+"));
    }

    #[test]
    fn test_reader_never_sees_grade() {
        let f = fixture();
        assert_eq!(f.render(2, &RequestContext::new(Actor::user(8))), "Body");

        let out = f.render(4, &RequestContext::new(Actor::user(8)));
        assert!(!out.contains("&lt;A&gt;"));
        assert!(out.contains(NOTE_PRIVATE));
        assert!(!out.contains(NOTE_PRIVATE_AND_GRADE));
    }

    #[test]
    fn test_admin_list_hides_grade_line() {
        let f = fixture();
        let ctx = prof().on_screen(Screen::AdminCommentList);
        assert_eq!(f.render(2, &ctx), "Body");
    }

    #[test]
    fn test_reply_link_labels() {
        let f = fixture();
        let decorator = DisplayDecorator::new(&f.store, &f.roles);

        let private = f.store.comment(CommentId(3)).unwrap();
        let args = decorator.decorate_reply_link(ReplyLinkArgs::default(), &private);
        assert_eq!(args.reply_text, "(Private) Reply");
        assert_eq!(args.reply_to_text, "(Private) Reply to %s");

        let public = f.store.comment(CommentId(2)).unwrap();
        let args = decorator.decorate_reply_link(ReplyLinkArgs::default(), &public);
        assert_eq!(args, ReplyLinkArgs::default());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#039;B&#039;&lt;/b&gt;");
    }
}
