//! Rendering hooks: comment text, reply links, form fields

pub mod decorator;
pub mod form;

pub use decorator::{escape_html, DisplayDecorator, ReplyLinkArgs, PRIVATE_LABEL};
pub use form::GradeEntryForm;
