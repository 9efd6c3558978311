//! Interaction state tagging
//!
//! States are class tokens on the element, so styling can key off them.
//! Missing or non-element targets are ignored.

use fos_dom::NodeId;

use crate::constants::State;
use crate::host::FormHost;

/// Applies, queries and removes interaction states
pub struct StateTagger;

impl StateTagger {
    pub fn set<H: FormHost + ?Sized>(host: &mut H, el: NodeId, state: State) {
        if host.add_class(el, state.class_name()) {
            tracing::trace!("{} +{}", el, state);
        }
    }

    pub fn has<H: FormHost + ?Sized>(host: &H, el: NodeId, state: State) -> bool {
        host.has_class(el, state.class_name())
    }

    pub fn clear<H: FormHost + ?Sized>(host: &mut H, el: NodeId, state: State) {
        if host.remove_class(el, state.class_name()) {
            tracing::trace!("{} -{}", el, state);
        }
    }

    /// Remove every element-scoped state
    pub fn reset<H: FormHost + ?Sized>(host: &mut H, el: NodeId) {
        for state in State::ELEMENT {
            Self::clear(host, el, state);
        }
    }
}
