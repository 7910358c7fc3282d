//! Visibility filtering of comment listings and feeds

use super::roles::RoleResolver;
use crate::comment::{
    Comment, CommentClauses, CommentQuery, CommentStore, StatusFilter, META_IS_PRIVATE,
};
use crate::comment::attributes::PRIVATE_FLAG;
use crate::types::{CommentId, PostId, RequestContext, UserId};
use std::collections::BTreeSet;
use tracing::debug;

/// Computes which comments a viewer may not see
#[derive(Clone, Copy)]
pub struct VisibilityFilter<'a> {
    store: &'a dyn CommentStore,
    roles: &'a RoleResolver,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(store: &'a dyn CommentStore, roles: &'a RoleResolver) -> Self {
        Self { store, roles }
    }

    /// Private comments hidden from `viewer`, optionally on one post.
    ///
    /// A viewer keeps their own comments and every comment on their own
    /// posts. Anonymous viewers keep nothing. Reads the store directly, so the
    /// listing filter never runs on its own lookup.
    pub fn inaccessible_comments(&self, viewer: UserId, post_id: Option<PostId>) -> BTreeSet<CommentId> {
        let mut query = CommentQuery::new()
            .with_meta(META_IS_PRIVATE, PRIVATE_FLAG)
            .with_status(StatusFilter::Any);
        query.post_id = post_id;

        let private = self.store.query(&query.clauses());

        private
            .into_iter()
            .filter(|comment| !self.is_exempt(viewer, comment))
            .map(|comment| comment.id)
            .collect()
    }

    fn is_exempt(&self, viewer: UserId, comment: &Comment) -> bool {
        if viewer.is_anonymous() {
            return false;
        }
        if comment.user_id == viewer {
            return true;
        }
        self.store
            .post(comment.post_id)
            .map(|post| post.author == viewer)
            .unwrap_or(false)
    }

    /// Listing hook: hide inaccessible comments unless the viewer sees everything.
    ///
    /// Instructors and the author of the scoped post (or, with no scope, of the
    /// queried post) get `base` back untouched.
    pub fn filter_listing_clauses(
        &self,
        base: CommentClauses,
        ctx: &RequestContext,
        post_scope: Option<PostId>,
    ) -> CommentClauses {
        if self.roles.is_instructor(&ctx.actor) || self.roles.is_author(self.store, ctx, post_scope) {
            return base;
        }

        let hidden = self.inaccessible_comments(ctx.actor.id, post_scope);
        debug!(
            viewer = %ctx.actor.id,
            hidden = hidden.len(),
            "Filtering private comments from listing"
        );
        base.exclude(hidden)
    }

    /// Feed hook: same exclusion, scoped to the feed's queried object.
    ///
    /// Feeds are not role-bypassed; a reader only keeps their own comments and
    /// comments on their own posts.
    pub fn filter_feed_clauses(
        &self,
        base: CommentClauses,
        ctx: &RequestContext,
        scoped_object: Option<PostId>,
    ) -> CommentClauses {
        let hidden = self.inaccessible_comments(ctx.actor.id, scoped_object);
        debug!(
            viewer = %ctx.actor.id,
            hidden = hidden.len(),
            "Filtering private comments from feed"
        );
        base.exclude(hidden)
    }

    /// Comments of `query` the viewer may see
    pub fn visible_comments(&self, query: &CommentQuery, ctx: &RequestContext) -> Vec<Comment> {
        let clauses = self.filter_listing_clauses(query.clauses(), ctx, query.post_id);
        self.store.query(&clauses)
    }

    /// Displayed comment count for a post, recounted for the viewer.
    ///
    /// Falls back to `default` when no post is given or it does not exist.
    pub fn comment_count(&self, default: usize, post_id: Option<PostId>, ctx: &RequestContext) -> usize {
        let Some(post_id) = post_id.filter(|id| self.store.post(*id).is_some()) else {
            return default;
        };
        let query = CommentQuery::for_post(post_id);
        let clauses = self.filter_listing_clauses(query.clauses(), ctx, Some(post_id));
        self.store.count(&clauses)
    }
}
