//! DOM Events
//!
//! Raw event listeners keyed by target and event type, and dispatch.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{DomError, NodeId, SharedDocument};

/// Event type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Input,
    Change,
    Focus,
    Blur,
    Submit,
    Reset,
    Click,
    KeyUp,
    Custom(String),
}

impl EventType {
    /// Map an event name to its type. Empty names are rejected.
    pub fn from_name(name: &str) -> Result<Self, DomError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.len() != name.len() {
            return Err(DomError::InvalidEventName(name.to_string()));
        }
        Ok(match name {
            "input" => Self::Input,
            "change" => Self::Change,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "click" => Self::Click,
            "keyup" => Self::KeyUp,
            other => Self::Custom(other.to_string()),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Click => "click",
            Self::KeyUp => "keyup",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Event delivered to listeners
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: NodeId,
    /// Element the listener is attached to
    pub current_target: NodeId,
}

impl DomEvent {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self { event_type, target, current_target: target }
    }
}

/// Event listener. Identity is the `Rc` allocation.
pub type Listener = Rc<dyn Fn(&DomEvent)>;

/// Listeners by target element and event type
#[derive(Default)]
pub struct ListenerRegistry {
    handlers: HashMap<(NodeId, EventType), Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Adding the same `Rc` twice is a no-op.
    pub fn add(&mut self, target: NodeId, event_type: EventType, listener: Listener) -> bool {
        let list = self.handlers.entry((target, event_type)).or_default();
        if list.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            return false;
        }
        list.push(listener);
        true
    }

    /// Remove a listener by reference identity
    pub fn remove(&mut self, target: NodeId, event_type: &EventType, listener: &Listener) -> bool {
        let key = (target, event_type.clone());
        let Some(list) = self.handlers.get_mut(&key) else {
            return false;
        };

        let before = list.len();
        list.retain(|l| !Rc::ptr_eq(l, listener));
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(&key);
        }
        removed
    }

    /// Snapshot of listeners in registration order
    pub fn get(&self, target: NodeId, event_type: &EventType) -> Vec<Listener> {
        self.handlers
            .get(&(target, event_type.clone()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, target: NodeId, event_type: &EventType) -> usize {
        self.handlers
            .get(&(target, event_type.clone()))
            .map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("total", &self.total())
            .finish()
    }
}

/// Fire an event at `target`.
///
/// Listeners are snapshotted and the document borrow is released before
/// any of them run, so handlers may borrow the document themselves.
/// Returns the number of listeners invoked.
pub fn dispatch_event(doc: &SharedDocument, target: NodeId, event_type: EventType) -> usize {
    let listeners = doc.borrow().listeners().get(target, &event_type);
    tracing::trace!("dispatch {} to {} ({} listeners)", event_type, target, listeners.len());

    let event = DomEvent::new(event_type, target);
    for listener in &listeners {
        listener(&event);
    }
    listeners.len()
}
