//! Document - High-level document API

use std::cell::RefCell;
use std::rc::Rc;

use crate::forms::is_control_tag;
use crate::{
    DOMStringMap, DOMTokenList, DomError, ElementData, EventType, FormControl, InputType,
    Listener, ListenerRegistry, Node, NodeData, NodeId, Pattern, ValidationConstraints, ValidityState,
};

/// Document shared between the host event loop and listeners
pub type SharedDocument = Rc<RefCell<Document>>;

/// Arena-backed HTML document
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    listeners: ListenerRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            listeners: ListenerRegistry::new(),
        }
    }

    /// Wrap for sharing with listeners
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a detached element. Control tags get default constraints.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let mut data = ElementData::new(tag);
        if is_control_tag(tag) {
            data.control = Some(FormControl::default());
        }
        self.push(Node::element(data))
    }

    /// Create a detached `input`/`select`/`textarea` with constraints
    pub fn create_control(&mut self, tag: &str, constraints: ValidationConstraints) -> NodeId {
        let mut data = ElementData::new(tag);
        data.control = Some(FormControl::new(constraints));
        self.push(Node::element(data))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        match self.get(parent).map(|n| &n.data) {
            None => return Err(DomError::NodeNotFound(parent)),
            Some(NodeData::Text(_)) => return Err(DomError::NotAnElement(parent)),
            Some(_) => {}
        }
        if self.get(child).is_none() || child == NodeId::ROOT {
            return Err(DomError::NodeNotFound(child));
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Apply a raw attribute to an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        match name {
            "class" => elem.classes = DOMTokenList::from_string(value),
            "hidden" => elem.display_none = true,
            "style" => {
                elem.display_none = value
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .any(|(p, v)| p.trim() == "display" && v.trim() == "none");
            }
            _ if name.starts_with("data-") => {
                elem.dataset.set_attribute(name, value);
            }
            _ => {
                let Some(control) = elem.control.as_mut() else {
                    return Ok(());
                };
                let c = &mut control.constraints;
                match name {
                    "required" => c.required = true,
                    "disabled" => control.disabled = true,
                    "value" => control.value = value.to_string(),
                    "type" => c.input_type = InputType::parse(value),
                    "pattern" => c.pattern = Some(Pattern::new(value)),
                    "minlength" => c.min_length = value.parse().ok(),
                    "maxlength" => c.max_length = value.parse().ok(),
                    "min" => c.min = value.parse().ok(),
                    "max" => c.max = value.parse().ok(),
                    "step" => c.step = value.parse().ok(),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        while cur.is_valid() {
            out.push(cur);
            cur = self.nodes[cur.index()].next_sibling;
        }
        out
    }

    /// All descendants in document order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).into_iter().rev());
        }
        out
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// First descendant element of `scope` with the tag and class
    pub fn query_tag_class(&self, scope: NodeId, tag: &str, class: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|&id| {
            self.element(id)
                .is_some_and(|e| e.tag.eq_ignore_ascii_case(tag) && e.classes.contains(class))
        })
    }

    /// Form controls under `form`, in document order
    pub fn controls_of(&self, form: NodeId) -> Vec<NodeId> {
        self.descendants(form)
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(|e| is_control_tag(&e.tag)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.nodes[d.index()].as_text())
            .collect()
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, content: &str) -> Result<(), DomError> {
        if !self.is_element(id) {
            return Err(DomError::NotAnElement(id));
        }
        for child in self.children(id) {
            self.detach(child);
        }
        if !content.is_empty() {
            let text = self.create_text(content);
            self.append_child(id, text)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Classes and dataset
    // ------------------------------------------------------------------

    pub fn classes(&self, id: NodeId) -> Option<&DOMTokenList> {
        self.element(id).map(|e| &e.classes)
    }

    pub fn classes_mut(&mut self, id: NodeId) -> Option<&mut DOMTokenList> {
        self.element_mut(id).map(|e| &mut e.classes)
    }

    pub fn dataset(&self, id: NodeId) -> Option<&DOMStringMap> {
        self.element(id).map(|e| &e.dataset)
    }

    // ------------------------------------------------------------------
    // Form controls
    // ------------------------------------------------------------------

    pub fn control(&self, id: NodeId) -> Option<&FormControl> {
        self.element(id)?.control.as_ref()
    }

    pub fn control_mut(&mut self, id: NodeId) -> Option<&mut FormControl> {
        self.element_mut(id)?.control.as_mut()
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.control(id).map(|c| c.value.as_str())
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let control = self.control_mut(id).ok_or(DomError::NotAnElement(id))?;
        control.value = value.to_string();
        Ok(())
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<(), DomError> {
        let control = self.control_mut(id).ok_or(DomError::NotAnElement(id))?;
        control.disabled = disabled;
        Ok(())
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.control(id).is_some_and(|c| c.disabled)
    }

    pub fn validity(&self, id: NodeId) -> Option<ValidityState> {
        self.control(id).map(FormControl::validity)
    }

    /// Non-controls are always valid
    pub fn check_validity(&self, id: NodeId) -> bool {
        self.control(id).is_none_or(FormControl::check_validity)
    }

    pub fn set_custom_validity(&mut self, id: NodeId, message: &str) {
        if let Some(control) = self.control_mut(id) {
            control.set_custom_validity(message);
        }
    }

    /// `form.checkValidity()`: every control that will validate is valid
    pub fn check_form_validity(&self, form: NodeId) -> bool {
        self.controls_of(form).into_iter().all(|id| self.check_validity(id))
    }

    // ------------------------------------------------------------------
    // Rendering state
    // ------------------------------------------------------------------

    pub fn set_display_none(&mut self, id: NodeId, none: bool) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        elem.display_none = none;
        Ok(())
    }

    /// Whether the node generates a box: connected to the document, with
    /// no `display: none` on it or any ancestor
    pub fn has_layout_box(&self, id: NodeId) -> bool {
        let mut cur = id;
        while cur.is_valid() {
            if cur == NodeId::ROOT {
                return true;
            }
            let Some(node) = self.get(cur) else { return false };
            if node.as_element().is_some_and(|e| e.display_none) {
                return false;
            }
            cur = node.parent;
        }
        false
    }

    /// Hidden means "no box, yet not itself `display: none`" (the
    /// `offsetParent === null` test). An element that is itself
    /// `display: none` therefore counts as visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(elem) = self.element(id) else { return false };
        elem.display_none || self.has_layout_box(id)
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn add_listener(&mut self, id: NodeId, event_type: EventType, listener: Listener) -> bool {
        if !self.is_element(id) {
            return false;
        }
        self.listeners.add(id, event_type, listener)
    }

    pub fn remove_listener(&mut self, id: NodeId, event_type: &EventType, listener: &Listener) -> bool {
        self.listeners.remove(id, event_type, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_input() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let wrap = doc.create_element("div");
        let input = doc.create_control("input", ValidationConstraints::required());
        doc.append_child(doc.root(), form).unwrap();
        doc.append_child(form, wrap).unwrap();
        doc.append_child(wrap, input).unwrap();
        (doc, form, wrap, input)
    }

    #[test]
    fn test_tree_links() {
        let (doc, form, wrap, input) = form_with_input();
        assert_eq!(doc.parent(input), Some(wrap));
        assert_eq!(doc.children(form), vec![wrap]);
        assert_eq!(doc.descendants(form), vec![wrap, input]);
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_detach_middle_child() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let kids: Vec<_> = (0..3).map(|_| doc.create_element("span")).collect();
        for &k in &kids {
            doc.append_child(parent, k).unwrap();
        }
        doc.detach(kids[1]);
        assert_eq!(doc.children(parent), vec![kids[0], kids[2]]);
        assert_eq!(doc.parent(kids[1]), None);
    }

    #[test]
    fn test_controls_and_form_validity() {
        let (mut doc, form, _, input) = form_with_input();
        assert_eq!(doc.controls_of(form), vec![input]);
        assert!(!doc.check_form_validity(form));

        doc.set_value(input, "hello").unwrap();
        assert!(doc.check_form_validity(form));
    }

    #[test]
    fn test_text_content_replaced() {
        let mut doc = Document::new();
        let span = doc.create_element("span");
        doc.set_text_content(span, "first").unwrap();
        doc.set_text_content(span, "second").unwrap();
        assert_eq!(doc.text_content(span), "second");
        assert_eq!(doc.children(span).len(), 1);
    }

    #[test]
    fn test_visibility_quirk() {
        let (mut doc, _, wrap, input) = form_with_input();
        assert!(doc.is_visible(input));

        // Hidden through an ancestor: no box, not itself display:none
        doc.set_display_none(wrap, true).unwrap();
        assert!(!doc.is_visible(input));

        // Itself display:none counts as visible
        doc.set_display_none(wrap, false).unwrap();
        doc.set_display_none(input, true).unwrap();
        assert!(doc.is_visible(input));
    }

    #[test]
    fn test_detached_control_is_hidden() {
        let (mut doc, form, _, input) = form_with_input();
        assert!(doc.has_layout_box(input));

        doc.detach(form);
        assert!(!doc.has_layout_box(input));
        assert!(!doc.is_visible(input));

        let loose = doc.create_control("input", ValidationConstraints::default());
        assert!(!doc.is_visible(loose));
    }

    #[test]
    fn test_set_attribute() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "required", "").unwrap();
        doc.set_attribute(input, "data-value-missing", "Please fill in").unwrap();
        doc.set_attribute(input, "class", "a b").unwrap();

        assert!(doc.validity(input).unwrap().value_missing);
        assert_eq!(doc.dataset(input).unwrap().get("valueMissing"), Some("Please fill in"));
        assert!(doc.classes(input).unwrap().contains("b"));

        let text = doc.create_text("x");
        assert_eq!(doc.set_attribute(text, "class", "a"), Err(DomError::NotAnElement(text)));
    }
}
