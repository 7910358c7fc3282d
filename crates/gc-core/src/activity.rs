//! Activity stream notifications for new and edited comments

use crate::comment::Comment;
use std::sync::Mutex;
use tracing::{debug, info};

/// Which comment lifecycle event happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    Posted,
    Edited,
}

/// A downstream system that mirrors comments into a public stream.
///
/// `suppress` is set for private comments; the stream must not publish them.
pub trait ActivityStream: Send + Sync {
    fn record_comment(&self, event: ActivityEvent, comment: &Comment, suppress: bool);
}

/// Writes activity to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogActivityStream;

impl ActivityStream for LogActivityStream {
    fn record_comment(&self, event: ActivityEvent, comment: &Comment, suppress: bool) {
        if suppress {
            debug!(comment = %comment.id, ?event, "Activity suppressed for private comment");
        } else {
            info!(comment = %comment.id, post = %comment.post_id, ?event, "Comment activity");
        }
    }
}

/// Keeps every published item in memory
#[derive(Debug, Default)]
pub struct MemoryActivityStream {
    published: Mutex<Vec<(ActivityEvent, Comment)>>,
}

impl MemoryActivityStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items published so far
    pub fn published(&self) -> Vec<(ActivityEvent, Comment)> {
        self.published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ActivityStream for MemoryActivityStream {
    fn record_comment(&self, event: ActivityEvent, comment: &Comment, suppress: bool) {
        if suppress {
            return;
        }
        self.published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((event, comment.clone()));
    }
}
