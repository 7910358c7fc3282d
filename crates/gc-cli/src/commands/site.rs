//! Loading the configured site for a command

use anyhow::{anyhow, bail, Context, Result};
use gc_core::comment::{CommentStore, InMemoryStore};
use gc_core::config::Config;
use gc_core::{Actor, GradeComments, PostId, RequestContext, Screen, UserId};
use gc_storage::FileSystemStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "grade-comments.toml";

/// Resolve the configuration path from the global flag
pub fn config_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Data file location; relative paths are taken from the config file's directory
pub fn data_path(config_path: &Path, config: &Config) -> PathBuf {
    if config.storage.data_file.is_absolute() {
        return config.storage.data_file.clone();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(&config.storage.data_file),
        _ => config.storage.data_file.clone(),
    }
}

/// A loaded site: storage and the hooks wired over it
pub struct Site {
    pub storage: FileSystemStorage,
    pub store: Arc<InMemoryStore>,
    pub hooks: GradeComments,
}

impl Site {
    /// Load configuration and site data
    pub fn open(config_flag: Option<&Path>) -> Result<Self> {
        let config_path = config_path(config_flag);
        if !config_path.exists() {
            bail!(
                "{} not found; run `grade-comments init` first",
                config_path.display()
            );
        }
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        let storage = FileSystemStorage::new(data_path(&config_path, &config))?;
        let store = Arc::new(storage.open_store()?);
        let hooks = GradeComments::new(store.clone(), &config);
        debug!(
            "Loaded site from {:?} with config {:?}",
            storage.path(),
            config_path
        );

        Ok(Self {
            storage,
            store,
            hooks,
        })
    }

    /// Write the site data back
    pub fn save(&self) -> Result<()> {
        self.storage
            .save_store(&self.store)
            .with_context(|| format!("Failed to save {}", self.storage.path().display()))
    }

    /// Build the acting user. `None` or `0` is an anonymous visitor.
    pub fn actor(&self, user: Option<u64>, session: Option<&str>) -> Result<Actor> {
        let id = match user {
            None | Some(0) => return Ok(Actor::anonymous()),
            Some(id) => UserId(id),
        };
        let user = self
            .store
            .user(id)
            .ok_or_else(|| anyhow!("User not found: {}", id))?;

        let mut actor = user.to_actor();
        if let Some(session) = session {
            actor = actor.with_session(session);
        }
        Ok(actor)
    }

    /// Request context for a viewer looking at a post
    pub fn request(&self, actor: Actor, post: Option<u64>, admin: bool) -> RequestContext {
        let mut ctx = RequestContext::new(actor);
        if let Some(post) = post {
            ctx = ctx.on_post(PostId(post));
        }
        if admin {
            ctx = ctx.on_screen(Screen::AdminCommentList);
        }
        ctx
    }

    /// Fail unless the user exists
    pub fn require_user(&self, user: u64) -> Result<UserId> {
        let user_id = UserId(user);
        if self.store.user(user_id).is_none() {
            return Err(anyhow!("User not found: {}", user_id));
        }
        Ok(user_id)
    }

    /// Fail unless the post exists
    pub fn require_post(&self, post: u64) -> Result<PostId> {
        let post_id = PostId(post);
        if self.store.post(post_id).is_none() {
            return Err(gc_core::GradeCommentsError::PostNotFound(post).into());
        }
        Ok(post_id)
    }
}
