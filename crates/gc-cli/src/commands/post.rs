//! Post command

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use gc_core::comment::Post;
use std::path::Path;

use super::site::Site;

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Add a post
    Add {
        /// Post title
        title: String,

        /// Authoring user
        #[arg(long)]
        author: u64,

        /// Post ID (default: next free ID)
        #[arg(long)]
        id: Option<u64>,
    },

    /// List posts
    List,
}

/// Execute the post command
pub fn execute(cmd: PostCommand, config_flag: Option<&Path>) -> Result<()> {
    let site = Site::open(config_flag)?;

    match cmd {
        PostCommand::Add { title, author, id } => {
            site.require_user(author)?;
            let id = match id {
                Some(id) => id,
                None => site.store.next_post_id()?.0,
            };
            site.store.add_post(Post::new(id, author, title))?;
            site.save()?;
            println!("{} Added post {}", "✓".green(), id);
        }
        PostCommand::List => {
            let posts = site.store.posts();
            if posts.is_empty() {
                println!("No posts.");
            }
            for post in posts {
                println!(
                    "  {:>4}  {}  {}",
                    post.id.0,
                    post.title.bold(),
                    format!("by user {}, {} comments", post.author, site.store.stored_count(post.id)).dimmed()
                );
            }
        }
    }

    Ok(())
}
