//! The hook surface a host platform wires into its request lifecycle

use crate::access::{EditGuard, RequiredCaps, RoleResolver, VisibilityFilter, EDIT_COMMENT};
use crate::activity::{ActivityEvent, ActivityStream, LogActivityStream};
use crate::comment::{
    AttributeStore, Comment, CommentAttributes, CommentClauses, CommentQuery, CommentStore,
};
use crate::config::{Config, GradeConfig};
use crate::render::{DisplayDecorator, GradeEntryForm, ReplyLinkArgs};
use crate::submission::{KeyedNonceVerifier, NonceVerifier, SubmissionHandler, SubmittedFields};
use crate::types::{Actor, CommentId, PostId, RequestContext, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Capability the reference host requires to edit someone else's comment
pub const MODERATE_COMMENTS: &str = "moderate_comments";

/// Private comments and grades, as a set of hook handlers
pub struct GradeComments {
    store: Arc<dyn CommentStore>,
    roles: RoleResolver,
    nonces: Arc<dyn NonceVerifier>,
    activity: Arc<dyn ActivityStream>,
    grades: GradeConfig,
}

impl GradeComments {
    /// Wire up the default collaborators from configuration
    pub fn new(store: Arc<dyn CommentStore>, config: &Config) -> Self {
        Self {
            store,
            roles: RoleResolver::from_config(&config.roles),
            nonces: Arc::new(KeyedNonceVerifier::from_config(&config.nonce)),
            activity: Arc::new(LogActivityStream),
            grades: config.grades.clone(),
        }
    }

    pub fn with_roles(mut self, roles: RoleResolver) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_nonces(mut self, nonces: Arc<dyn NonceVerifier>) -> Self {
        self.nonces = nonces;
        self
    }

    pub fn with_activity(mut self, activity: Arc<dyn ActivityStream>) -> Self {
        self.activity = activity;
        self
    }

    pub fn store(&self) -> &dyn CommentStore {
        self.store.as_ref()
    }

    pub fn roles(&self) -> &RoleResolver {
        &self.roles
    }

    pub fn nonces(&self) -> &dyn NonceVerifier {
        self.nonces.as_ref()
    }

    pub fn visibility(&self) -> VisibilityFilter<'_> {
        VisibilityFilter::new(self.store(), &self.roles)
    }

    fn attributes(&self) -> AttributeStore<'_> {
        AttributeStore::new(self.store())
    }

    // Roles

    pub fn is_instructor(&self, actor: &Actor) -> bool {
        self.roles.is_instructor(actor)
    }

    pub fn is_author(&self, ctx: &RequestContext, post_id: Option<PostId>) -> bool {
        self.roles.is_author(self.store(), ctx, post_id)
    }

    pub fn comment_attributes(&self, id: CommentId) -> CommentAttributes {
        self.attributes().get(id)
    }

    // Hooks

    /// `comment_form_defaults`
    pub fn comment_form_defaults(&self, ctx: &RequestContext, post_id: PostId) -> Option<GradeEntryForm> {
        GradeEntryForm::for_request(&self.roles, self.nonces(), &self.grades, ctx, post_id)
    }

    /// `wp_insert_comment`
    pub fn insert_comment(&self, comment: &Comment, submitted: &SubmittedFields, actor: &Actor) {
        SubmissionHandler::new(self.store(), &self.roles, self.nonces(), &self.grades)
            .on_comment_inserted(comment, submitted, actor);
    }

    /// `get_comment_text`
    pub fn comment_text(&self, text: &str, comment: &Comment, ctx: &RequestContext) -> String {
        DisplayDecorator::new(self.store(), &self.roles).decorate(text, comment, ctx)
    }

    /// `comment_reply_link_args`
    pub fn comment_reply_link_args(&self, args: ReplyLinkArgs, comment: &Comment) -> ReplyLinkArgs {
        DisplayDecorator::new(self.store(), &self.roles).decorate_reply_link(args, comment)
    }

    /// `comments_clauses`
    pub fn comments_clauses(
        &self,
        base: CommentClauses,
        ctx: &RequestContext,
        post_scope: Option<PostId>,
    ) -> CommentClauses {
        self.visibility().filter_listing_clauses(base, ctx, post_scope)
    }

    /// `comment_feed_where`
    pub fn comment_feed_where(
        &self,
        base: CommentClauses,
        ctx: &RequestContext,
        scoped_object: Option<PostId>,
    ) -> CommentClauses {
        self.visibility().filter_feed_clauses(base, ctx, scoped_object)
    }

    /// `get_comments_number`
    pub fn comments_number(&self, default: usize, post_id: Option<PostId>, ctx: &RequestContext) -> usize {
        self.visibility().comment_count(default, post_id, ctx)
    }

    /// `map_meta_cap`
    pub fn map_meta_cap(
        &self,
        caps: RequiredCaps,
        cap: &str,
        actor: &Actor,
        target: Option<CommentId>,
    ) -> RequiredCaps {
        EditGuard::new(self.store(), &self.roles).filter_edit_capability(caps, cap, actor, target)
    }

    /// `comment_post`: tell the activity stream, suppressed if private
    pub fn comment_posted(&self, id: CommentId) {
        self.notify_activity(ActivityEvent::Posted, id);
    }

    /// `edit_comment`: tell the activity stream, suppressed if private
    pub fn comment_edited(&self, id: CommentId) {
        self.notify_activity(ActivityEvent::Edited, id);
    }

    fn notify_activity(&self, event: ActivityEvent, id: CommentId) {
        let Some(comment) = self.store.comment(id) else {
            return;
        };
        let suppress = self.attributes().is_private(id);
        self.activity.record_comment(event, &comment, suppress);
    }

    // Viewer-scoped reads

    /// Run a listing through the visibility hook
    pub fn list_comments(&self, query: &CommentQuery, ctx: &RequestContext) -> Vec<Comment> {
        self.visibility().visible_comments(query, ctx)
    }

    /// Approved comments for a feed, newest first
    pub fn feed_comments(&self, ctx: &RequestContext, scoped_object: Option<PostId>) -> Vec<Comment> {
        let base = CommentQuery {
            post_id: scoped_object,
            ..CommentQuery::new()
        }
        .clauses();
        let clauses = self.comment_feed_where(base, ctx, scoped_object);
        let mut comments = self.store.query(&clauses);
        comments.reverse();
        comments
    }

    pub fn inaccessible_comments(&self, viewer: UserId, post_id: Option<PostId>) -> BTreeSet<CommentId> {
        self.visibility().inaccessible_comments(viewer, post_id)
    }

    /// Whether `actor` may edit the comment, with the reference host's
    /// mapping: own comments need nothing, others need `moderate_comments`.
    pub fn can_edit_comment(&self, actor: &Actor, id: CommentId) -> bool {
        let Some(comment) = self.store.comment(id) else {
            return false;
        };
        let base = if actor.is_logged_in() && comment.user_id == actor.id {
            RequiredCaps::default()
        } else {
            RequiredCaps::new([MODERATE_COMMENTS])
        };
        self.map_meta_cap(base, EDIT_COMMENT, actor, Some(id))
            .satisfied_by(actor)
    }
}

impl std::fmt::Debug for GradeComments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradeComments")
            .field("roles", &self.roles)
            .field("grades", &self.grades)
            .finish_non_exhaustive()
    }
}
