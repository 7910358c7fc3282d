//! gc-storage - Storage library for grade-comments
//!
//! Persists the reference host's users, posts, comments and comment
//! metadata as a single versioned JSON file.

mod site_store;

pub use site_store::{FileSystemStorage, SiteFile, CURRENT_SCHEMA_VERSION};
