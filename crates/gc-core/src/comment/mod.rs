//! Comment module
//!
//! Host records, the storage trait, query clauses, and the two per-comment
//! attributes kept in metadata.

pub mod model;
pub mod query;
pub mod store;
pub mod index;
pub mod memory;
pub mod attributes;

pub use model::*;
pub use query::{CommentClauses, CommentQuery, Condition, StatusFilter};
pub use store::CommentStore;
pub use index::CommentIndex;
pub use memory::{InMemoryStore, MetaEntry, SiteSnapshot};
pub use attributes::{AttributeStore, CommentAttributes, META_GRADE, META_IS_PRIVATE};
