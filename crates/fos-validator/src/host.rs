//! Host document contract
//!
//! Everything the validator needs from the document it runs against.
//! `fos_dom::Document` is the reference host.

use fos_dom::{ConstraintKind, Document, EventType, Listener, NodeId};

use crate::constants::{ERROR_CLASS, ERROR_TAG};

/// Host-side collaborator interface
pub trait FormHost {
    fn is_element(&self, el: NodeId) -> bool;

    // -- constraint snapshot ------------------------------------------

    /// `element.checkValidity()`
    fn is_valid(&self, el: NodeId) -> bool;

    /// Every constraint with its violated flag, in the host's canonical order
    fn violated_constraints(&self, el: NodeId) -> Vec<(ConstraintKind, bool)>;

    /// `data-*` value by camelCase key
    fn data(&self, el: NodeId, key: &str) -> Option<String>;

    /// Configured message for a violated constraint
    fn message_for(&self, el: NodeId, kind: ConstraintKind) -> Option<String> {
        self.data(el, kind.dataset_key())
    }

    fn is_visible(&self, el: NodeId) -> bool;

    fn is_disabled(&self, el: NodeId) -> bool;

    /// `setCustomValidity`; empty text clears the custom error
    fn set_annotation(&mut self, el: NodeId, text: &str);

    /// `form.checkValidity()`
    fn check_form_validity(&self, form: NodeId) -> bool;

    /// Controls of a form in document order
    fn form_controls(&self, form: NodeId) -> Vec<NodeId>;

    // -- class tokens -------------------------------------------------

    fn add_class(&mut self, el: NodeId, class: &str) -> bool;

    fn has_class(&self, el: NodeId, class: &str) -> bool;

    fn remove_class(&mut self, el: NodeId, class: &str) -> bool;

    // -- error node ---------------------------------------------------

    /// Container the error node lives in (the element's parent)
    fn container(&self, el: NodeId) -> Option<NodeId>;

    fn find_error_node(&self, container: NodeId) -> Option<NodeId>;

    /// Create and append a fresh error node
    fn create_error_node(&mut self, container: NodeId) -> Option<NodeId>;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn text(&self, node: NodeId) -> String;

    // -- events -------------------------------------------------------

    fn on(&mut self, el: NodeId, event: EventType, listener: Listener) -> bool;

    fn off(&mut self, el: NodeId, event: &EventType, listener: &Listener) -> bool;
}

impl FormHost for Document {
    fn is_element(&self, el: NodeId) -> bool {
        Document::is_element(self, el)
    }

    fn is_valid(&self, el: NodeId) -> bool {
        self.check_validity(el)
    }

    fn violated_constraints(&self, el: NodeId) -> Vec<(ConstraintKind, bool)> {
        self.validity(el)
            .map(|v| v.violations().collect())
            .unwrap_or_default()
    }

    fn data(&self, el: NodeId, key: &str) -> Option<String> {
        self.dataset(el)?.get(key).map(str::to_string)
    }

    fn is_visible(&self, el: NodeId) -> bool {
        Document::is_visible(self, el)
    }

    fn is_disabled(&self, el: NodeId) -> bool {
        Document::is_disabled(self, el)
    }

    fn set_annotation(&mut self, el: NodeId, text: &str) {
        self.set_custom_validity(el, text);
    }

    fn check_form_validity(&self, form: NodeId) -> bool {
        Document::check_form_validity(self, form)
    }

    fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        self.controls_of(form)
    }

    fn add_class(&mut self, el: NodeId, class: &str) -> bool {
        self.classes_mut(el).is_some_and(|c| c.add(class))
    }

    fn has_class(&self, el: NodeId, class: &str) -> bool {
        self.classes(el).is_some_and(|c| c.contains(class))
    }

    fn remove_class(&mut self, el: NodeId, class: &str) -> bool {
        self.classes_mut(el).is_some_and(|c| c.remove(class))
    }

    fn container(&self, el: NodeId) -> Option<NodeId> {
        self.parent(el)
    }

    fn find_error_node(&self, container: NodeId) -> Option<NodeId> {
        self.query_tag_class(container, ERROR_TAG, ERROR_CLASS)
    }

    fn create_error_node(&mut self, container: NodeId) -> Option<NodeId> {
        let node = self.create_element(ERROR_TAG);
        self.add_class(node, ERROR_CLASS);
        self.append_child(container, node).ok()?;
        Some(node)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Err(err) = self.set_text_content(node, text) {
            tracing::warn!("cannot set error text: {}", err);
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.text_content(node)
    }

    fn on(&mut self, el: NodeId, event: EventType, listener: Listener) -> bool {
        self.add_listener(el, event, listener)
    }

    fn off(&mut self, el: NodeId, event: &EventType, listener: &Listener) -> bool {
        self.remove_listener(el, event, listener)
    }
}
