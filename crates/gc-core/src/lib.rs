//! gc-core - Core library for grade-comments
//!
//! Private comments and grades for blog posts. Instructors can mark a
//! comment private (visible only to instructors and the post's author) and
//! attach a short grade to it. Everything here is a hook handler a host
//! platform calls during its request lifecycle; [`plugin::GradeComments`]
//! bundles them.

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod access;
pub mod submission;
pub mod render;
pub mod activity;
pub mod plugin;

pub use error::{GradeCommentsError, Result};
pub use plugin::GradeComments;
pub use types::*;
