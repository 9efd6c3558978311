//! DOMStringMap (dataset)
//!
//! `data-*` attributes. Form controls keep their per-constraint error
//! messages here (`data-value-missing="..."` is read as `valueMissing`).

use std::collections::HashMap;

/// DOMStringMap for data-* attributes
#[derive(Debug, Clone, Default)]
pub struct DOMStringMap {
    data: HashMap<String, String>,
}

impl DOMStringMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `(attribute, value)` pairs, keeping only `data-*`
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut map = Self::new();
        for (name, value) in attrs {
            map.set_attribute(name, value);
        }
        map
    }

    /// Set from a raw attribute name. Returns false for non-`data-*` names.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        match name.strip_prefix("data-") {
            Some(key) if !key.is_empty() => {
                self.data.insert(to_camel_case(key), value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Get value by camelCase key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set value by camelCase key
    pub fn set(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Attribute name for a camelCase key
    pub fn to_attribute_name(key: &str) -> String {
        format!("data-{}", to_kebab_case(key))
    }
}

/// kebab-case to camelCase
fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper = false;

    for c in s.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            result.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// camelCase to kebab-case
fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
