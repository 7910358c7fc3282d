//! Config command
//!
//! Inspect grade-comments configuration.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use gc_core::config::Config;
use std::path::Path;

use super::site::{config_path, data_path};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_flag: Option<&Path>) -> Result<()> {
    let path = config_path(config_flag);
    match cmd {
        ConfigCommand::Show { json } => show_config(&path, json),
        ConfigCommand::Validate => validate_config(&path),
    }
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    if !path.exists() {
        eprintln!(
            "{} {} not found, showing defaults. Run '{}' to create it.",
            "⚠".yellow(),
            path.display(),
            "grade-comments init".cyan()
        );
    }

    let mut config = Config::load_or_default(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    config.nonce.secret = "<redacted>".to_string();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Configuration:".bold().underline());
        println!("{}", path.display().to_string().dimmed());
        println!();
        print!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("{} not found", path.display());
    }

    match Config::load(path) {
        Ok(config) => {
            println!("{} Configuration is valid.", "✓".green());
            println!(
                "  Instructor capability: {}",
                config.roles.instructor_capability.cyan()
            );
            if !config.roles.instructors.is_empty() {
                let ids: Vec<String> = config.roles.instructors.iter().map(u64::to_string).collect();
                println!("  Instructors by ID:     {}", ids.join(", "));
            }
            match config.grades.limit() {
                Some(limit) => println!("  Grade length limit:    {}", limit),
                None => println!("  Grade length limit:    {}", "none".dimmed()),
            }
            println!("  Data file:             {}", data_path(path, &config).display());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Configuration has errors:", "✗".red());
            Err(e).context("Invalid configuration")
        }
    }
}
