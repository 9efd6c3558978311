//! Custom Validity API
//!
//! Form control state: value, constraints and the custom validity message.

use super::validation::{InputType, ValidationConstraints, ValidityState};

/// Form control with validation
#[derive(Debug, Clone, Default)]
pub struct FormControl {
    pub value: String,
    pub constraints: ValidationConstraints,
    pub disabled: bool,
    /// Set by `set_custom_validity`; non-empty means `customError`
    custom_message: String,
}

impl FormControl {
    pub fn new(constraints: ValidationConstraints) -> Self {
        Self { constraints, ..Default::default() }
    }

    /// Current validity, recomputed from the value
    pub fn validity(&self) -> ValidityState {
        let mut state = self.constraints.evaluate(&self.value);
        state.custom_error = !self.custom_message.is_empty();
        state
    }

    /// Disabled controls and `type=hidden` inputs are barred from
    /// constraint validation
    pub fn will_validate(&self) -> bool {
        !self.disabled && self.constraints.input_type != InputType::Hidden
    }

    pub fn check_validity(&self) -> bool {
        !self.will_validate() || self.validity().is_valid()
    }

    pub fn set_custom_validity(&mut self, message: &str) {
        self.custom_message = message.to_string();
    }

    pub fn custom_validity(&self) -> &str {
        &self.custom_message
    }
}
