//! Feed command
//!
//! Print the comment feed of the site or of one post, newest first.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::comment::ViewerArgs;
use super::site::Site;

/// Arguments for the feed command
#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Feed of a single post (default: site-wide)
    #[arg(long)]
    pub post: Option<u64>,

    #[command(flatten)]
    pub viewer: ViewerArgs,

    /// Maximum number of items
    #[arg(long, short, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the feed command
pub fn execute(args: FeedArgs, config_flag: Option<&Path>) -> Result<()> {
    let site = Site::open(config_flag)?;
    let scope = args.post.map(|p| site.require_post(p)).transpose()?;
    let actor = site.actor(args.viewer.as_user, args.viewer.session.as_deref())?;
    let ctx = site.request(actor, args.post, false);

    let mut items = site.hooks.feed_comments(&ctx, scope);
    items.truncate(args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("Feed is empty.");
        return Ok(());
    }

    for comment in items {
        println!(
            "{} {} on post {}: {}",
            comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            comment.author_name.bold(),
            comment.post_id,
            comment.content
        );
    }

    Ok(())
}
