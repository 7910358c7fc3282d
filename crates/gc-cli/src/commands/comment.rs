//! Comment command
//!
//! Submit, list and inspect comments as a given viewer. Every read goes
//! through the visibility and display hooks.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use gc_core::comment::{Comment, CommentQuery, CommentStatus, CommentStore, StatusFilter};
use gc_core::render::ReplyLinkArgs;
use gc_core::submission::SubmittedFields;
use gc_core::{CommentId, RequestContext};
use serde::Serialize;
use std::path::Path;

use super::site::Site;

/// Who is looking
#[derive(Debug, Clone, Args)]
pub struct ViewerArgs {
    /// Act as this user ID (default: anonymous visitor)
    #[arg(long = "as", value_name = "USER")]
    pub as_user: Option<u64>,

    /// Login session token of the acting user
    #[arg(long)]
    pub session: Option<String>,
}

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Submit a comment through the comment form
    Add {
        /// Comment text
        content: String,

        /// Post to comment on
        #[arg(long)]
        post: u64,

        #[command(flatten)]
        viewer: ViewerArgs,

        /// Reply to this comment
        #[arg(long)]
        reply_to: Option<u64>,

        /// Tick the private-response checkbox
        #[arg(long)]
        private: bool,

        /// Tick add-a-grade and enter this grade
        #[arg(long)]
        grade: Option<String>,

        /// Submit this anti-forgery token instead of the form's
        #[arg(long)]
        nonce: Option<String>,

        /// Moderation status of the stored comment
        #[arg(long, value_parser = parse_status)]
        status: Option<CommentStatus>,
    },

    /// List comments visible to a viewer
    List {
        /// Restrict to one post
        #[arg(long)]
        post: Option<u64>,

        #[command(flatten)]
        viewer: ViewerArgs,

        /// Status to list: approved, pending, spam, trash or any
        #[arg(long, default_value = "approved", value_parser = parse_status_filter)]
        status: StatusFilter,

        /// Render as the administrative comment list
        #[arg(long)]
        admin: bool,

        /// Print the filtered query clauses
        #[arg(long)]
        clauses: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one comment as a viewer sees it
    Show {
        /// Comment ID
        id: u64,

        #[command(flatten)]
        viewer: ViewerArgs,

        /// Render as the administrative comment list
        #[arg(long)]
        admin: bool,
    },

    /// Comment count of a post as a viewer sees it
    Count {
        /// Post ID
        #[arg(long)]
        post: u64,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Check whether a user may edit a comment
    CanEdit {
        /// Comment ID
        id: u64,

        #[command(flatten)]
        viewer: ViewerArgs,
    },
}

/// A listed comment with its rendered text
#[derive(Debug, Serialize)]
struct RenderedComment {
    #[serde(flatten)]
    comment: Comment,
    rendered: String,
}

/// Execute the comment command
pub fn execute(cmd: CommentCommand, config_flag: Option<&Path>) -> Result<()> {
    let site = Site::open(config_flag)?;

    match cmd {
        CommentCommand::Add {
            content,
            post,
            viewer,
            reply_to,
            private,
            grade,
            nonce,
            status,
        } => {
            let submission = Submission {
                content,
                reply_to: reply_to.map(CommentId),
                private,
                grade,
                nonce,
                status: status.unwrap_or_default(),
            };
            add_comment(&site, post, &viewer, submission)
        }
        CommentCommand::List {
            post,
            viewer,
            status,
            admin,
            clauses,
            json,
        } => {
            let actor = site.actor(viewer.as_user, viewer.session.as_deref())?;
            let ctx = site.request(actor, post, admin);
            let query = CommentQuery {
                post_id: post.map(|p| site.require_post(p)).transpose()?,
                ..CommentQuery::new()
            }
            .with_status(status);

            if clauses {
                let filtered = site
                    .hooks
                    .comments_clauses(query.clauses(), &ctx, query.post_id);
                println!("{} {}", "WHERE".dimmed(), filtered);
            }

            let comments: Vec<RenderedComment> = site
                .hooks
                .list_comments(&query, &ctx)
                .into_iter()
                .map(|comment| RenderedComment {
                    rendered: site.hooks.comment_text(&comment.content, &comment, &ctx),
                    comment,
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&comments)?);
            } else if comments.is_empty() {
                println!("No comments.");
            } else {
                for item in &comments {
                    print_comment(item);
                }
            }
            Ok(())
        }
        CommentCommand::Show { id, viewer, admin } => {
            let Some(comment) = site.store.comment(CommentId(id)) else {
                bail!(gc_core::GradeCommentsError::CommentNotFound(id));
            };
            let actor = site.actor(viewer.as_user, viewer.session.as_deref())?;
            let ctx = site.request(actor, Some(comment.post_id.0), admin);

            if !is_visible(&site, &comment, &ctx) {
                bail!("Comment {} is not visible to this viewer", id);
            }

            let rendered = site.hooks.comment_text(&comment.content, &comment, &ctx);
            let reply = site
                .hooks
                .comment_reply_link_args(ReplyLinkArgs::default(), &comment);

            print_comment(&RenderedComment { comment, rendered });
            println!("        [{}]", reply.reply_text.cyan());
            Ok(())
        }
        CommentCommand::Count { post, viewer } => {
            let post_id = site.require_post(post)?;
            let actor = site.actor(viewer.as_user, viewer.session.as_deref())?;
            let ctx = site.request(actor, Some(post), false);

            let stored = site.store.count(&CommentQuery::for_post(post_id).clauses());
            let visible = site.hooks.comments_number(stored, Some(post_id), &ctx);
            println!("{}", visible);
            Ok(())
        }
        CommentCommand::CanEdit { id, viewer } => {
            let actor = site.actor(viewer.as_user, viewer.session.as_deref())?;
            if site.store.comment(CommentId(id)).is_none() {
                bail!(gc_core::GradeCommentsError::CommentNotFound(id));
            }
            if site.hooks.can_edit_comment(&actor, CommentId(id)) {
                println!("{}", "yes".green());
            } else {
                println!("{}", "no".red());
            }
            Ok(())
        }
    }
}

/// The comment form as filled in by the user
struct Submission {
    content: String,
    reply_to: Option<CommentId>,
    private: bool,
    grade: Option<String>,
    nonce: Option<String>,
    status: CommentStatus,
}

fn add_comment(site: &Site, post: u64, viewer: &ViewerArgs, submission: Submission) -> Result<()> {
    let post_id = site.require_post(post)?;
    let actor = site.actor(viewer.as_user, viewer.session.as_deref())?;
    let ctx = site.request(actor.clone(), Some(post), false);

    // Only instructors see the grading fields and get a token with them
    let form = site.hooks.comment_form_defaults(&ctx, post_id);
    if form.is_none() && (submission.private || submission.grade.is_some()) {
        eprintln!(
            "{} Not an instructor; the private and grade fields are not on this form.",
            "⚠".yellow()
        );
    }

    let mut fields = SubmittedFields::default();
    if submission.private {
        fields.private_comment = Some("1".to_string());
    }
    if let Some(grade) = submission.grade {
        fields.add_a_grade = Some("1".to_string());
        fields.grade = Some(grade);
    }
    fields.nonce = submission.nonce.or_else(|| form.map(|f| f.nonce));

    let author_name = site
        .store
        .user(actor.id)
        .map(|u| u.login)
        .unwrap_or_else(|| "Anonymous".to_string());

    let next_id = site.store.next_comment_id()?;
    let mut comment = Comment::new(next_id.0, post_id, actor.id, submission.content)
        .with_author_name(author_name)
        .with_status(submission.status);
    if let Some(parent) = submission.reply_to {
        comment = comment.reply_to(parent);
    }

    let id = site.store.insert_comment(comment.clone())?;
    site.hooks.insert_comment(&comment, &fields, &actor);
    site.hooks.comment_posted(id);
    site.save()?;

    let attributes = site.hooks.comment_attributes(id);
    let mut notes = Vec::new();
    if attributes.is_private {
        notes.push("private".to_string());
    }
    if let Some(grade) = attributes.grade {
        notes.push(format!("grade {}", grade));
    }
    if notes.is_empty() {
        println!("{} Added comment {}", "✓".green(), id);
    } else {
        println!("{} Added comment {} ({})", "✓".green(), id, notes.join(", ").cyan());
    }
    Ok(())
}

/// Whether the comment survives the viewer's listing filter.
///
/// Unapproved comments are only shown to instructors and their own author.
fn is_visible(site: &Site, comment: &Comment, ctx: &RequestContext) -> bool {
    let own = ctx.actor.is_logged_in() && comment.user_id == ctx.actor.id;
    let status = if own || site.hooks.is_instructor(&ctx.actor) {
        StatusFilter::Any
    } else {
        StatusFilter::Approved
    };
    let query = CommentQuery::for_post(comment.post_id).with_status(status);
    site.hooks
        .list_comments(&query, ctx)
        .iter()
        .any(|c| c.id == comment.id)
}

fn print_comment(item: &RenderedComment) {
    let comment = &item.comment;
    let mut header = format!("#{} {}", comment.id, comment.author_name.bold());
    if let Some(parent) = comment.parent {
        header.push_str(&format!(" (reply to #{})", parent));
    }
    if comment.status != CommentStatus::Approved {
        header.push_str(&format!(" [{}]", comment.status).yellow().to_string());
    }
    println!("  {}", header);
    for line in item.rendered.lines() {
        println!("      {}", line);
    }
}

fn parse_status(s: &str) -> Result<CommentStatus, String> {
    CommentStatus::from_name(s).ok_or_else(|| format!("unknown comment status '{}'", s))
}

fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    match s {
        "any" | "all" => Ok(StatusFilter::Any),
        "approved" => Ok(StatusFilter::Approved),
        other => parse_status(other).map(StatusFilter::Only),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter("any").unwrap(), StatusFilter::Any);
        assert_eq!(parse_status_filter("approved").unwrap(), StatusFilter::Approved);
        assert_eq!(
            parse_status_filter("pending").unwrap(),
            StatusFilter::Only(CommentStatus::Pending)
        );
        assert!(parse_status_filter("deleted").is_err());
    }
}
