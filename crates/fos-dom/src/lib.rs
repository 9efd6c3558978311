//! fOS DOM - Document Object Model
//!
//! Arena-backed host document for form validation: element tree, class
//! tokens, `data-*` maps, constraint validity and raw event listeners.

mod node;
mod document;
pub mod classlist;
pub mod dataset;
pub mod events;
pub mod forms;

pub use node::{Node, NodeData, ElementData};
pub use document::{Document, SharedDocument};
pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use events::{DomEvent, EventType, Listener, ListenerRegistry, dispatch_event};
pub use forms::{ConstraintKind, FormControl, InputType, Pattern, ValidationConstraints, ValidityState};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Invalid/null node ID
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}

/// DOM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Invalid event name: {0:?}")]
    InvalidEventName(String),
}
