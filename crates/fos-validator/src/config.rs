//! Validator configuration

use fos_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::host::FormHost;

/// Which UI events the validator listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Listen to `blur`: mark visited, validate if dirty
    pub validate_on_blur: bool,

    /// Listen to `change`: mark dirty
    pub validate_on_change: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            validate_on_blur: true,
            validate_on_change: true,
        }
    }
}

impl ValidatorOptions {
    pub fn validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }

    /// Layer `data-validate-on-blur` / `data-validate-on-change` from the
    /// form element over these options. Only `"true"` and `"false"` are
    /// understood; anything else leaves the option as is.
    pub fn with_form_overrides<H: FormHost + ?Sized>(mut self, host: &H, form: NodeId) -> Self {
        if let Some(v) = read_flag(host, form, "validateOnBlur") {
            self.validate_on_blur = v;
        }
        if let Some(v) = read_flag(host, form, "validateOnChange") {
            self.validate_on_change = v;
        }
        self
    }
}

fn read_flag<H: FormHost + ?Sized>(host: &H, form: NodeId, key: &str) -> Option<bool> {
    let raw = host.data(form, key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "" => Some(true),
        "false" => Some(false),
        other => {
            tracing::warn!("ignoring data-{} value {:?} on {}", key, other, form);
            None
        }
    }
}
