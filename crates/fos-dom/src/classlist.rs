//! DOMTokenList (classList)
//!
//! Class tokens on an element. Interaction states and the error node's
//! visibility are both carried as class tokens.

/// Ordered set of space-separated tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a `class` attribute value
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(token);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns false if it was empty or already present.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || token.contains(char::is_whitespace) || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token. Returns true if it was present.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle token, returns new membership
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        match force {
            Some(true) => {
                self.add(token);
                true
            }
            Some(false) => {
                self.remove(token);
                false
            }
            None if self.contains(token) => {
                self.remove(token);
                false
            }
            None => self.add(token),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }

    /// Serialized `class` attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_dedups() {
        let list = DOMTokenList::from_string("dirty visited dirty");
        assert_eq!(list.len(), 2);
        assert_eq!(list.value(), "dirty visited");
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = DOMTokenList::new();
        assert!(list.add("dirty"));
        assert!(!list.add("dirty"));
        assert!(!list.add(""));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_missing_token() {
        let mut list = DOMTokenList::from_string("hide");
        assert!(!list.remove("visited"));
        assert!(list.remove("hide"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();
        assert!(list.toggle("hide", None));
        assert!(!list.toggle("hide", None));
        assert!(list.toggle("hide", Some(true)));
        assert!(list.toggle("hide", Some(true)));
        assert!(list.contains("hide"));
        assert!(!list.toggle("hide", Some(false)));
    }
}
