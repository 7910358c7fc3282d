//! Error types for grade-comments
//!
//! Hook handlers never surface these; they only appear at the edges
//! (configuration, snapshot persistence, record insertion).

use thiserror::Error;

/// Main error type for grade-comments
#[derive(Debug, Error)]
pub enum GradeCommentsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(u64),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(u64),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GradeCommentsError>,
    },
}

impl GradeCommentsError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GradeCommentsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for GradeCommentsError {
    fn from(err: toml::de::Error) -> Self {
        GradeCommentsError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for GradeCommentsError {
    fn from(err: toml::ser::Error) -> Self {
        GradeCommentsError::Toml(err.to_string())
    }
}

/// Result type alias for grade-comments
pub type Result<T> = std::result::Result<T, GradeCommentsError>;
