//! Init command
//!
//! Write a starter configuration and an empty site.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gc_core::comment::SiteSnapshot;
use gc_core::config::Config;
use gc_storage::FileSystemStorage;
use std::path::Path;
use uuid::Uuid;

use super::site::{config_path, data_path};

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Capability that marks a user as an instructor
    #[arg(long)]
    pub instructor_capability: Option<String>,

    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs, config_flag: Option<&Path>) -> Result<()> {
    let config_path = config_path(config_flag);

    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists. Use --force to reinitialize.",
            "⚠".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    let mut config = Config::default();
    config.nonce.secret = generate_secret();
    if let Some(capability) = args.instructor_capability {
        config.roles.instructor_capability = capability;
    }
    config.validate()?;
    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} Wrote {}", "✓".green(), config_path.display());

    let storage = FileSystemStorage::new(data_path(&config_path, &config))?;
    if !storage.exists() || args.force {
        storage.save(&SiteSnapshot::default())?;
        println!("{} Created empty site at {}", "✓".green(), storage.path().display());
    }

    println!("\n{}", "Next steps:".bold());
    println!("  1. Add an instructor:");
    println!(
        "     {}",
        format!(
            "grade-comments user add 1 prof --cap {}",
            config.roles.instructor_capability
        )
        .cyan()
    );
    println!("  2. Add a post and start commenting:");
    println!("     {}", "grade-comments post add --author 2 \"Essay 1\"".cyan());

    Ok(())
}

/// Fresh random token secret for this site
fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config_and_site() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("grade-comments.toml");

        execute(
            InitArgs {
                instructor_capability: Some("edit_others_posts".to_string()),
                force: false,
            },
            Some(&config_path),
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.roles.instructor_capability, "edit_others_posts");
        assert_eq!(config.nonce.secret.len(), 64);
        assert!(temp.path().join(".grade-comments/site.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("grade-comments.toml");
        std::fs::write(
            &config_path,
            "[grades]\nmax_length = 3\n\n[nonce]\nsecret = \"0123456789abcdef0123\"\n",
        )
        .unwrap();

        execute(
            InitArgs {
                instructor_capability: None,
                force: false,
            },
            Some(&config_path),
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.grades.max_length, 3);
    }

    #[test]
    fn test_secrets_are_random() {
        let first = generate_secret();
        let second = generate_secret();
        assert_ne!(first, second);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
