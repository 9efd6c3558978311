//! Validator constants

/// Interaction state, carried on elements as a class token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Value changed since the state was last cleared
    Dirty,
    /// A custom rule is currently failing with its message shown here
    VirtuallyDirty,
    /// Element has lost focus at least once
    Visited,
    /// Form-scoped: a submit-time validation ran
    Submitted,
}

impl State {
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Dirty => "dirty",
            Self::VirtuallyDirty => "virtually_dirty",
            Self::Visited => "visited",
            Self::Submitted => "submitted",
        }
    }

    /// Element-scoped states (everything except `Submitted`)
    pub const ELEMENT: [State; 3] = [Self::Dirty, Self::VirtuallyDirty, Self::Visited];
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Every state, for embedders that enumerate them
pub const STATES: [State; 4] = [State::Dirty, State::VirtuallyDirty, State::Visited, State::Submitted];

/// Class marking the inline error node
pub const ERROR_CLASS: &str = "form-validator_error";

/// Tag of the inline error node
pub const ERROR_TAG: &str = "span";

/// Class hiding the inline error node
pub const HIDE_CLASS: &str = "hide";
