//! Inline error messages
//!
//! One error node per container, created lazily and reused afterwards.
//! Showing is an upsert and clearing only hides, so the synchronous and
//! async paths can both write to it in any order.

use fos_dom::NodeId;

use crate::constants::{State, HIDE_CLASS};
use crate::host::FormHost;
use crate::state::StateTagger;

/// Shows and clears the error message attached to an element
pub struct ErrorPresenter;

impl ErrorPresenter {
    /// Display `message` for `el`. Last write wins.
    pub fn show<H: FormHost + ?Sized>(host: &mut H, el: NodeId, message: &str) {
        let Some(container) = host.container(el) else {
            tracing::warn!("no container for {}, cannot show {:?}", el, message);
            return;
        };

        let node = match host.find_error_node(container) {
            Some(node) => node,
            None => match host.create_error_node(container) {
                Some(node) => node,
                None => {
                    tracing::warn!("failed to create error node in {}", container);
                    return;
                }
            },
        };

        host.set_text(node, message);
        host.remove_class(node, HIDE_CLASS);
        host.set_annotation(el, message);
        tracing::debug!("error on {}: {}", el, message);
    }

    /// Hide the error for `el`, if one was ever shown, and drop its custom
    /// validity and `VirtuallyDirty` state.
    pub fn clear<H: FormHost + ?Sized>(host: &mut H, el: NodeId) {
        let Some(node) = host.container(el).and_then(|c| host.find_error_node(c)) else {
            return;
        };

        host.add_class(node, HIDE_CLASS);
        host.set_annotation(el, "");
        StateTagger::clear(host, el, State::VirtuallyDirty);
    }

    /// Visible message for `el`, if any
    pub fn message<H: FormHost + ?Sized>(host: &H, el: NodeId) -> Option<String> {
        let node = host.container(el).and_then(|c| host.find_error_node(c))?;
        if host.has_class(node, HIDE_CLASS) {
            return None;
        }
        Some(host.text(node))
    }

    pub fn is_shown<H: FormHost + ?Sized>(host: &H, el: NodeId) -> bool {
        Self::message(host, el).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ERROR_CLASS, ERROR_TAG};
    use fos_dom::{Document, ValidationConstraints};

    fn setup() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let wrap = doc.create_element("div");
        let input = doc.create_control("input", ValidationConstraints::default());
        doc.append_child(doc.root(), wrap).unwrap();
        doc.append_child(wrap, input).unwrap();
        (doc, wrap, input)
    }

    fn error_nodes(doc: &Document, wrap: NodeId) -> usize {
        doc.children(wrap)
            .into_iter()
            .filter(|&c| doc.tag(c) == Some(ERROR_TAG) && doc.classes(c).unwrap().contains(ERROR_CLASS))
            .count()
    }

    #[test]
    fn test_show_twice_single_node() {
        let (mut doc, wrap, input) = setup();
        ErrorPresenter::show(&mut doc, input, "x");
        ErrorPresenter::show(&mut doc, input, "x");

        assert_eq!(error_nodes(&doc, wrap), 1);
        assert_eq!(ErrorPresenter::message(&doc, input).as_deref(), Some("x"));
    }

    #[test]
    fn test_last_write_wins() {
        let (mut doc, wrap, input) = setup();
        ErrorPresenter::show(&mut doc, input, "first");
        ErrorPresenter::show(&mut doc, input, "second");

        assert_eq!(error_nodes(&doc, wrap), 1);
        assert_eq!(ErrorPresenter::message(&doc, input).as_deref(), Some("second"));
    }

    #[test]
    fn test_show_sets_annotation() {
        let (mut doc, _, input) = setup();
        ErrorPresenter::show(&mut doc, input, "Taken");
        assert!(doc.validity(input).unwrap().custom_error);
        assert!(!doc.check_validity(input));

        ErrorPresenter::clear(&mut doc, input);
        assert!(doc.check_validity(input));
        assert!(!ErrorPresenter::is_shown(&doc, input));
    }

    #[test]
    fn test_clear_then_show_reuses_node() {
        let (mut doc, wrap, input) = setup();
        ErrorPresenter::show(&mut doc, input, "a");
        ErrorPresenter::clear(&mut doc, input);
        ErrorPresenter::show(&mut doc, input, "b");

        assert_eq!(error_nodes(&doc, wrap), 1);
        assert_eq!(ErrorPresenter::message(&doc, input).as_deref(), Some("b"));
    }

    #[test]
    fn test_clear_without_node_is_noop() {
        let (mut doc, wrap, input) = setup();
        ErrorPresenter::clear(&mut doc, input);
        assert_eq!(error_nodes(&doc, wrap), 0);
    }

    #[test]
    fn test_detached_element_tolerated() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        ErrorPresenter::show(&mut doc, input, "nowhere");
        ErrorPresenter::clear(&mut doc, input);
        ErrorPresenter::clear(&mut doc, NodeId::NONE);
        assert_eq!(ErrorPresenter::message(&doc, input), None);
    }
}
