//! User command
//!
//! Register site users and their capabilities.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use gc_core::comment::User;
use std::path::Path;

use super::site::Site;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        /// User ID (must be non-zero)
        id: u64,

        /// Login name
        login: String,

        /// Capability to grant (repeatable)
        #[arg(long = "cap")]
        capabilities: Vec<String>,
    },

    /// List users and their roles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the user command
pub fn execute(cmd: UserCommand, config_flag: Option<&Path>) -> Result<()> {
    let site = Site::open(config_flag)?;

    match cmd {
        UserCommand::Add {
            id,
            login,
            capabilities,
        } => {
            let user = capabilities
                .into_iter()
                .fold(User::new(id, login), |user, cap| user.with_capability(cap));
            let is_instructor = site.hooks.is_instructor(&user.to_actor());
            site.store.add_user(user)?;
            site.save()?;

            println!(
                "{} Added user {}{}",
                "✓".green(),
                id,
                if is_instructor { " (instructor)".cyan().to_string() } else { String::new() }
            );
        }
        UserCommand::List { json } => {
            let users = site.store.snapshot().users;
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
                return Ok(());
            }
            if users.is_empty() {
                println!("No users.");
                return Ok(());
            }
            for user in users {
                let role = if site.hooks.is_instructor(&user.to_actor()) {
                    format!("{:<10}", "instructor").cyan()
                } else {
                    format!("{:<10}", "user").normal()
                };
                let caps: Vec<&str> = user.capabilities.iter().map(String::as_str).collect();
                println!(
                    "  {:>4}  {:<16} {} {}",
                    user.id.0,
                    user.login,
                    role,
                    caps.join(",").dimmed()
                );
            }
        }
    }

    Ok(())
}
