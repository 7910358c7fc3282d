//! Access control: roles, visibility of private comments, edit protection

pub mod roles;
pub mod visibility;
pub mod edit_guard;

pub use roles::{CapabilityPolicy, ConfiguredInstructors, InstructorPolicy, RoleResolver};
pub use visibility::VisibilityFilter;
pub use edit_guard::{EditGuard, RequiredCaps, DO_NOT_ALLOW, EDIT_COMMENT};
