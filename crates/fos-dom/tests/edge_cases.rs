//! Edge case tests for fos-dom
//!
//! Tree links, form controls, visibility and event dispatch.

use std::cell::Cell;
use std::rc::Rc;

use fos_dom::{
    dispatch_event, ConstraintKind, Document, DomError, DomEvent, EventType, InputType, Listener, NodeId,
    ValidationConstraints,
};

fn form_with_input(constraints: ValidationConstraints) -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let form = doc.create_element("form");
    let wrap = doc.create_element("div");
    let input = doc.create_control("input", constraints);
    doc.append_child(doc.root(), form).unwrap();
    doc.append_child(form, wrap).unwrap();
    doc.append_child(wrap, input).unwrap();
    (doc, form, wrap, input)
}

// ============================================================================
// TREE EDGE CASES
// ============================================================================

#[test]
fn test_append_moves_node() {
    let mut doc = Document::new();
    let a = doc.create_element("div");
    let b = doc.create_element("div");
    let child = doc.create_element("span");
    doc.append_child(a, child).unwrap();
    doc.append_child(b, child).unwrap();

    assert!(doc.children(a).is_empty());
    assert_eq!(doc.children(b), vec![child]);
    assert_eq!(doc.parent(child), Some(b));
}

#[test]
fn test_append_to_text_fails() {
    let mut doc = Document::new();
    let text = doc.create_text("hi");
    let el = doc.create_element("b");
    assert!(doc.append_child(text, el).is_err());
}

#[test]
fn test_missing_node_lookups() {
    let doc = Document::new();
    assert!(!doc.is_element(NodeId::NONE));
    assert_eq!(doc.parent(NodeId::NONE), None);
    assert!(doc.children(NodeId::NONE).is_empty());
    assert_eq!(doc.text_content(NodeId::NONE), "");
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    doc.set_text_content(span, "one").unwrap();
    doc.set_text_content(span, "two").unwrap();
    assert_eq!(doc.children(span).len(), 1);
    assert_eq!(doc.text_content(span), "two");
}

// ============================================================================
// FORM CONTROL EDGE CASES
// ============================================================================

#[test]
fn test_controls_in_document_order() {
    let (mut doc, form, wrap, input) = form_with_input(ValidationConstraints::default());
    let select = doc.create_element("select");
    let area = doc.create_element("textarea");
    doc.append_child(form, select).unwrap();
    doc.append_child(wrap, area).unwrap();

    assert_eq!(doc.controls_of(form), vec![input, area, select]);
}

#[test]
fn test_attributes_configure_constraints() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::default());
    doc.set_attribute(input, "type", "number").unwrap();
    doc.set_attribute(input, "min", "1").unwrap();
    doc.set_attribute(input, "max", "10").unwrap();

    doc.set_value(input, "42").unwrap();
    assert!(doc.validity(input).unwrap().range_overflow);

    doc.set_value(input, "forty").unwrap();
    assert!(doc.validity(input).unwrap().bad_input);

    doc.set_value(input, "5").unwrap();
    assert!(doc.check_validity(input));
}

#[test]
fn test_custom_validity_marks_invalid() {
    let (mut doc, form, _, input) = form_with_input(ValidationConstraints::default());
    doc.set_custom_validity(input, "Taken");
    assert!(!doc.check_validity(input));
    assert!(!doc.check_form_validity(form));

    doc.set_custom_validity(input, "");
    assert!(doc.check_form_validity(form));
}

#[test]
fn test_disabled_control_is_valid() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::required());
    assert!(!doc.check_validity(input));
    doc.set_disabled(input, true).unwrap();
    assert!(doc.check_validity(input));
}

#[test]
fn test_hidden_type_skips_validation() {
    let (mut doc, form, _, input) = form_with_input(ValidationConstraints::required());
    assert!(!doc.check_form_validity(form));
    doc.set_attribute(input, "type", "hidden").unwrap();
    assert!(doc.check_validity(input));
    assert!(doc.check_form_validity(form));
}

#[test]
fn test_pattern_attribute_is_regex() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::default());
    doc.set_attribute(input, "pattern", "[0-9]{3}").unwrap();

    doc.set_value(input, "123").unwrap();
    assert!(doc.check_validity(input));

    doc.set_value(input, "12\u{e9}").unwrap();
    assert!(doc.validity(input).unwrap().pattern_mismatch);

    doc.set_attribute(input, "pattern", "[0-9").unwrap();
    assert!(doc.check_validity(input));
}

#[test]
fn test_violations_in_canonical_order() {
    let constraints = ValidationConstraints::required().with_type(InputType::Email);
    let (mut doc, _, _, input) = form_with_input(constraints);
    doc.set_value(input, "nope").unwrap();

    let violations: Vec<ConstraintKind> = doc
        .validity(input)
        .unwrap()
        .violations()
        .filter(|(_, violated)| *violated)
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(violations, vec![ConstraintKind::TypeMismatch]);
}

#[test]
fn test_data_attributes_camel_case() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::default());
    doc.set_attribute(input, "data-pattern-mismatch", "Digits only").unwrap();
    assert_eq!(doc.dataset(input).unwrap().get("patternMismatch"), Some("Digits only"));
}

// ============================================================================
// VISIBILITY EDGE CASES
// ============================================================================

#[test]
fn test_hidden_ancestor_hides_control() {
    let (mut doc, _, wrap, input) = form_with_input(ValidationConstraints::default());
    assert!(doc.is_visible(input));
    doc.set_display_none(wrap, true).unwrap();
    assert!(!doc.has_layout_box(input));
    assert!(!doc.is_visible(input));
}

#[test]
fn test_display_none_on_self_counts_visible() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::default());
    doc.set_attribute(input, "style", "display: none").unwrap();
    assert!(!doc.has_layout_box(input));
    assert!(doc.is_visible(input));
}

// ============================================================================
// EVENT EDGE CASES
// ============================================================================

#[test]
fn test_event_names() {
    assert_eq!(EventType::from_name("blur"), Ok(EventType::Blur));
    assert_eq!(EventType::from_name("paste"), Ok(EventType::Custom("paste".into())));
    assert_eq!(EventType::from_name(""), Err(DomError::InvalidEventName(String::new())));
    assert!(EventType::from_name("change ").is_err());
}

#[test]
fn test_listener_may_mutate_document() {
    let (doc, _, _, input) = form_with_input(ValidationConstraints::default());
    let doc = doc.into_shared();
    let handle = doc.clone();
    let listener: Listener = Rc::new(move |event: &DomEvent| {
        handle.borrow_mut().set_value(event.target, "typed").unwrap();
    });
    doc.borrow_mut().add_listener(input, EventType::Input, listener);

    assert_eq!(dispatch_event(&doc, input, EventType::Input), 1);
    assert_eq!(doc.borrow().value(input), Some("typed"));
}

#[test]
fn test_same_listener_added_once() {
    let (mut doc, _, _, input) = form_with_input(ValidationConstraints::default());
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let listener: Listener = Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1));

    assert!(doc.add_listener(input, EventType::Change, listener.clone()));
    assert!(!doc.add_listener(input, EventType::Change, listener.clone()));

    let doc = doc.into_shared();
    dispatch_event(&doc, input, EventType::Change);
    assert_eq!(calls.get(), 1);

    assert!(doc.borrow_mut().remove_listener(input, &EventType::Change, &listener));
    dispatch_event(&doc, input, EventType::Change);
    assert_eq!(calls.get(), 1);
}
