//! Native constraint reporting
//!
//! Turns the host's validity snapshot into at most one message per element.

use fos_dom::{ConstraintKind, NodeId};

use crate::host::FormHost;
use crate::presenter::ErrorPresenter;

/// An element currently failing native validity, with its snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSetEntry {
    pub element: NodeId,
    /// All constraints in canonical order, `true` where violated
    pub violated: Vec<(ConstraintKind, bool)>,
}

impl ValidationSetEntry {
    /// Build an entry if `el` is currently invalid
    pub fn for_element<H: FormHost + ?Sized>(host: &H, el: NodeId) -> Option<Self> {
        if host.is_valid(el) {
            return None;
        }
        Some(Self {
            element: el,
            violated: host.violated_constraints(el),
        })
    }
}

/// Collects and reports native constraint failures
pub struct NativeConstraintChecker;

impl NativeConstraintChecker {
    /// Entries for visible, enabled, invalid elements, in input order.
    ///
    /// Hidden and disabled fields are skipped even when invalid: the user
    /// cannot correct them, so they must not block submission.
    pub fn collect_failures<H: FormHost + ?Sized>(host: &H, elements: &[NodeId]) -> Vec<ValidationSetEntry> {
        elements
            .iter()
            .filter(|&&el| host.is_visible(el) && !host.is_disabled(el))
            .filter_map(|&el| ValidationSetEntry::for_element(host, el))
            .collect()
    }

    /// Show the first configured message per entry. True only when there
    /// was nothing to report.
    pub fn report<H: FormHost + ?Sized>(host: &mut H, entries: &[ValidationSetEntry]) -> bool {
        for entry in entries {
            match Self::first_message(host, entry) {
                Some((kind, message)) => {
                    tracing::trace!("{} violates {}", entry.element, kind.dataset_key());
                    ErrorPresenter::show(host, entry.element, &message);
                }
                None => tracing::debug!("{} is invalid but has no configured message", entry.element),
            }
        }
        entries.is_empty()
    }

    /// First violated constraint, in canonical order, that has a message
    pub fn first_message<H: FormHost + ?Sized>(host: &H, entry: &ValidationSetEntry) -> Option<(ConstraintKind, String)> {
        entry
            .violated
            .iter()
            .filter(|(_, violated)| *violated)
            .find_map(|&(kind, _)| host.message_for(entry.element, kind).map(|m| (kind, m)))
    }
}
