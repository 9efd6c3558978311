//! Form Controls Module
//!
//! Constraint validation for `input`, `select` and `textarea`.

mod validation;
mod control;

pub use validation::{ConstraintKind, InputType, Pattern, ValidationConstraints, ValidityState};
pub use control::FormControl;

/// Tags treated as form controls
pub const CONTROL_TAGS: [&str; 3] = ["input", "select", "textarea"];

/// Check if a tag names a form control
pub fn is_control_tag(tag: &str) -> bool {
    CONTROL_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}
