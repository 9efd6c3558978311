//! fOS Form Validator
//!
//! Client-side form validation over an fOS document: interaction-state
//! tracking, native constraint reporting, synchronous and asynchronous
//! custom rules, and inline error messages.
//!
//! # Example
//! ```rust,ignore
//! use fos_validator::{FormValidator, ValidatorOptions};
//!
//! let validator = FormValidator::with_options(doc.clone(), form, ValidatorOptions::default())?;
//! validator.add_custom_validation(email, check_domain, None, "Unknown domain", None)?;
//! if validator.validate_form() {
//!     submit();
//! }
//! smol::block_on(validator.settle());
//! ```

mod constants;
mod host;
mod state;
mod presenter;
mod native;
mod rules;
mod queue;
mod engine;
mod config;
mod controller;

pub use constants::{State, STATES, ERROR_CLASS, ERROR_TAG, HIDE_CLASS};
pub use host::FormHost;
pub use state::StateTagger;
pub use presenter::ErrorPresenter;
pub use native::{NativeConstraintChecker, ValidationSetEntry};
pub use rules::{
    AsyncCheckFn, AsyncResult, AsyncRule, CheckFn, CheckOutcome, CustomValidationRegistry,
    FailureFn, ParseErrorFn, Rule, RuleHandle, RuleKind, SuccessFn, SyncRule,
};
pub use queue::AsyncQueue;
pub use engine::ValidationEngine;
pub use config::ValidatorOptions;
pub use controller::FormValidator;

pub use fos_dom::{Listener, NodeId};

/// Validator errors
///
/// Only configuration can fail. A rule rejecting a value is reported as
/// data (`false`, a message, or a callback), never as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("FormValidator is not loaded: {0} is not a form element")]
    MissingForm(NodeId),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
