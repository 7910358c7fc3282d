//! CLI commands module
//!
//! Each command loads the configured site, drives the hooks the way a host
//! request would, and saves the site back when it changed.

pub mod comment;
pub mod config;
pub mod feed;
pub mod init;
pub mod post;
pub mod site;
pub mod user;

use clap::{Parser, Subcommand};

/// grade-comments - private comments and grades on a comment thread
#[derive(Debug, Parser)]
#[command(name = "grade-comments")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path (default: grade-comments.toml)
    #[arg(short, long, global = true, env = "GRADE_COMMENTS_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a configuration file and an empty site
    Init(init::InitArgs),

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Submit and read comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Show the comment feed
    Feed(feed::FeedArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init(args) => init::execute(args, config_path),
        Commands::User(cmd) => user::execute(cmd, config_path),
        Commands::Post(cmd) => post::execute(cmd, config_path),
        Commands::Comment(cmd) => comment::execute(cmd, config_path),
        Commands::Feed(args) => feed::execute(args, config_path),
        Commands::Config(cmd) => config::execute(cmd, config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
