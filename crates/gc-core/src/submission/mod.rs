//! Comment submission: form tokens and the insert hook

pub mod nonce;
pub mod handler;

pub use nonce::{grade_entry_action, KeyedNonceVerifier, NonceVerifier};
pub use handler::{
    unslash, SubmissionHandler, SubmittedFields, FIELD_ADD_GRADE, FIELD_GRADE, FIELD_NONCE,
    FIELD_PRIVATE,
};
