//! Configuration management for grade-comments

use crate::error::{GradeCommentsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Capability that makes a user an instructor unless a policy says otherwise
pub const DEFAULT_INSTRUCTOR_CAPABILITY: &str = "manage_options";

/// Width of the grade input in the comment form
pub const DEFAULT_GRADE_MAX_LENGTH: usize = 5;

/// Shortest accepted token secret
pub const MIN_SECRET_LENGTH: usize = 16;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Role settings
    pub roles: RolesConfig,
    /// Grade settings
    pub grades: GradeConfig,
    /// Anti-forgery token settings
    pub nonce: NonceConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GradeCommentsError::Io(e).with_context(format!("Failed to read {}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check for values the hooks cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.roles.instructor_capability.trim().is_empty() {
            return Err(GradeCommentsError::Config(
                "roles.instructor_capability cannot be empty".to_string(),
            ));
        }
        if self.nonce.secret.is_empty() {
            return Err(GradeCommentsError::Config(
                "nonce.secret is not set; run `grade-comments init` to generate one".to_string(),
            ));
        }
        if self.nonce.secret.len() < MIN_SECRET_LENGTH {
            return Err(GradeCommentsError::Config(format!(
                "nonce.secret must be at least {} characters",
                MIN_SECRET_LENGTH
            )));
        }
        if self.nonce.lifetime_secs < 2 {
            return Err(GradeCommentsError::Config(
                "nonce.lifetime_secs must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Role-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Capability checked to decide who is an instructor
    pub instructor_capability: String,
    /// User IDs promoted to instructor regardless of capabilities
    pub instructors: Vec<u64>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            instructor_capability: DEFAULT_INSTRUCTOR_CAPABILITY.to_string(),
            instructors: Vec::new(),
        }
    }
}

/// Grade-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeConfig {
    /// Maximum grade length in characters, `0` for no server-side limit
    pub max_length: usize,
}

impl GradeConfig {
    /// The enforced limit, if any
    pub fn limit(&self) -> Option<usize> {
        (self.max_length > 0).then_some(self.max_length)
    }
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_GRADE_MAX_LENGTH,
        }
    }
}

/// Anti-forgery token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceConfig {
    /// Secret mixed into every token. Unset by default; grades cannot be
    /// entered until one is configured.
    pub secret: String,
    /// How long a token stays valid, in seconds
    pub lifetime_secs: u64,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            lifetime_secs: 86_400,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file holding users, posts, comments and metadata
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(".grade-comments/site.json"),
        }
    }
}
