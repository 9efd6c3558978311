//! Form Validation
//!
//! Constraint Validation API: validity flags and the constraints that
//! produce them.

use once_cell::sync::Lazy;
use regex::Regex;

// Same shapes browsers accept for type=email / type=url
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("email regex")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url regex"));

/// A single native constraint
///
/// Declaration order is the canonical scan order used when picking the
/// message to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    ValueMissing,
    TypeMismatch,
    PatternMismatch,
    TooLong,
    TooShort,
    RangeUnderflow,
    RangeOverflow,
    StepMismatch,
    BadInput,
    CustomError,
}

impl ConstraintKind {
    /// All constraints in canonical order
    pub const ALL: [ConstraintKind; 10] = [
        Self::ValueMissing,
        Self::TypeMismatch,
        Self::PatternMismatch,
        Self::TooLong,
        Self::TooShort,
        Self::RangeUnderflow,
        Self::RangeOverflow,
        Self::StepMismatch,
        Self::BadInput,
        Self::CustomError,
    ];

    /// camelCase key, as used by `ValidityState` and `dataset`
    pub fn dataset_key(self) -> &'static str {
        match self {
            Self::ValueMissing => "valueMissing",
            Self::TypeMismatch => "typeMismatch",
            Self::PatternMismatch => "patternMismatch",
            Self::TooLong => "tooLong",
            Self::TooShort => "tooShort",
            Self::RangeUnderflow => "rangeUnderflow",
            Self::RangeOverflow => "rangeOverflow",
            Self::StepMismatch => "stepMismatch",
            Self::BadInput => "badInput",
            Self::CustomError => "customError",
        }
    }
}

/// Validity state for form controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl ValidityState {
    pub fn get(&self, kind: ConstraintKind) -> bool {
        match kind {
            ConstraintKind::ValueMissing => self.value_missing,
            ConstraintKind::TypeMismatch => self.type_mismatch,
            ConstraintKind::PatternMismatch => self.pattern_mismatch,
            ConstraintKind::TooLong => self.too_long,
            ConstraintKind::TooShort => self.too_short,
            ConstraintKind::RangeUnderflow => self.range_underflow,
            ConstraintKind::RangeOverflow => self.range_overflow,
            ConstraintKind::StepMismatch => self.step_mismatch,
            ConstraintKind::BadInput => self.bad_input,
            ConstraintKind::CustomError => self.custom_error,
        }
    }

    /// Every constraint with its flag, in canonical order
    pub fn violations(&self) -> impl Iterator<Item = (ConstraintKind, bool)> + '_ {
        ConstraintKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Check if the element is valid
    pub fn is_valid(&self) -> bool {
        ConstraintKind::ALL.iter().all(|&kind| !self.get(kind))
    }
}

/// Input type, as far as validation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Url,
    Number,
    /// Barred from constraint validation
    Hidden,
}

impl InputType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "url" => Self::Url,
            "number" | "range" => Self::Number,
            "hidden" => Self::Hidden,
            _ => Self::Text,
        }
    }
}

/// Validation constraints for a form control
#[derive(Debug, Clone, Default)]
pub struct ValidationConstraints {
    pub required: bool,
    pub pattern: Option<Pattern>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub input_type: InputType,
}

impl ValidationConstraints {
    pub fn required() -> Self {
        Self { required: true, ..Default::default() }
    }

    pub fn with_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(Pattern::new(pattern));
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Compute validity for a value. `custom_error` is left untouched.
    pub fn evaluate(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();

        if value.is_empty() {
            state.value_missing = self.required;
            return state;
        }

        let chars = value.chars().count();
        if let Some(min) = self.min_length {
            state.too_short = chars < min;
        }
        if let Some(max) = self.max_length {
            state.too_long = chars > max;
        }

        if let Some(ref pattern) = self.pattern {
            state.pattern_mismatch = !pattern.matches(value);
        }

        match self.input_type {
            InputType::Email => state.type_mismatch = !EMAIL_REGEX.is_match(value),
            InputType::Url => state.type_mismatch = !URL_REGEX.is_match(value),
            InputType::Number => match value.trim().parse::<f64>() {
                Ok(num) => self.check_numeric(num, &mut state),
                Err(_) => state.bad_input = true,
            },
            _ => {}
        }

        state
    }

    fn check_numeric(&self, num: f64, state: &mut ValidityState) {
        if let Some(min) = self.min {
            state.range_underflow = num < min;
        }
        if let Some(max) = self.max {
            state.range_overflow = num > max;
        }
        if let Some(step) = self.step.filter(|s| *s > 0.0) {
            let diff = num - self.min.unwrap_or(0.0);
            let rem = (diff / step).fract().abs();
            state.step_mismatch = rem > 1e-9 && (1.0 - rem) > 1e-9;
        }
    }
}

/// Compiled `pattern` attribute
///
/// The whole value must match, as if written `^(?:pattern)$`. A pattern
/// that fails to compile imposes no constraint.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        let regex = match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!("ignoring invalid pattern {:?}: {}", source, err);
                None
            }
        };
        Self { regex }
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.as_ref().is_none_or(|r| r.is_match(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_state_valid() {
        assert!(ValidityState::default().is_valid());
    }

    #[test]
    fn test_violations_canonical_order() {
        let state = ValidityState { too_short: true, value_missing: true, ..Default::default() };
        let violated: Vec<_> = state.violations().filter(|(_, v)| *v).map(|(k, _)| k).collect();
        assert_eq!(violated, vec![ConstraintKind::ValueMissing, ConstraintKind::TooShort]);
    }

    #[test]
    fn test_required_empty() {
        let state = ValidationConstraints::required().evaluate("");
        assert!(state.value_missing);
        assert!(!state.is_valid());

        let state = ValidationConstraints::default().evaluate("");
        assert!(state.is_valid());
    }

    #[test]
    fn test_length_constraints() {
        let c = ValidationConstraints::default().with_length(Some(3), Some(5));
        assert!(c.evaluate("ab").too_short);
        assert!(c.evaluate("abcdef").too_long);
        assert!(c.evaluate("abcd").is_valid());
    }

    #[test]
    fn test_number_constraints() {
        let mut c = ValidationConstraints::default()
            .with_type(InputType::Number)
            .with_range(Some(0.0), Some(100.0));
        c.step = Some(5.0);

        assert!(c.evaluate("-1").range_underflow);
        assert!(c.evaluate("101").range_overflow);
        assert!(c.evaluate("7").step_mismatch);
        assert!(c.evaluate("abc").bad_input);
        assert!(c.evaluate("50").is_valid());
    }

    #[test]
    fn test_type_mismatch() {
        let email = ValidationConstraints::default().with_type(InputType::Email);
        assert!(email.evaluate("nope").type_mismatch);
        assert!(email.evaluate("a@b.io").is_valid());

        let url = ValidationConstraints::default().with_type(InputType::Url);
        assert!(url.evaluate("example.com").type_mismatch);
        assert!(url.evaluate("https://example.com").is_valid());
    }

    #[test]
    fn test_pattern_is_anchored_regex() {
        let c = ValidationConstraints::default().with_pattern("[0-9]{3}");
        assert!(c.evaluate("123").is_valid());
        assert!(c.evaluate("1234").pattern_mismatch);
        assert!(c.evaluate("x123").pattern_mismatch);

        let alt = ValidationConstraints::default().with_pattern("cat|dog");
        assert!(alt.evaluate("dog").is_valid());
        assert!(alt.evaluate("catdog").pattern_mismatch);
    }

    #[test]
    fn test_pattern_multibyte_values() {
        let c = ValidationConstraints::default().with_pattern("a*b");
        assert!(c.evaluate("a\u{e9}").pattern_mismatch);
        assert!(c.evaluate("aab").is_valid());

        let cafe = ValidationConstraints::default().with_pattern("caf.");
        assert!(cafe.evaluate("caf\u{e9}").is_valid());
        assert!(cafe.evaluate("\u{e9}t\u{e9}").pattern_mismatch);
    }

    #[test]
    fn test_invalid_pattern_is_ignored() {
        let c = ValidationConstraints::default().with_pattern("([");
        assert!(!c.pattern.as_ref().unwrap().is_valid());
        assert!(c.evaluate("anything").is_valid());
    }
}
