//! Validation engine
//!
//! Runs single-input and whole-form passes. Within a pass native
//! constraints come first; custom sync rules stop at the first failure;
//! async rules are queued as one sequential chain and never affect the
//! returned verdict.
//!
//! The host is borrowed only around host operations, never while user
//! code (checks, callbacks) runs, so that code may touch the document.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::constants::State;
use crate::host::FormHost;
use crate::native::{NativeConstraintChecker, ValidationSetEntry};
use crate::presenter::ErrorPresenter;
use crate::queue::AsyncQueue;
use crate::rules::{AsyncRule, CheckOutcome, CustomValidationRegistry, SyncRule};
use crate::state::StateTagger;

/// Validation passes over one form
pub struct ValidationEngine<H: FormHost + 'static> {
    host: Rc<RefCell<H>>,
    form: NodeId,
    /// Controls captured when the engine was built
    elements: Vec<NodeId>,
    registry: Rc<RefCell<CustomValidationRegistry>>,
    queue: AsyncQueue,
}

impl<H: FormHost + 'static> ValidationEngine<H> {
    pub fn new(host: Rc<RefCell<H>>, form: NodeId) -> Self {
        let elements = host.borrow().form_controls(form);
        tracing::debug!("validation engine for {} with {} controls", form, elements.len());
        Self {
            host,
            form,
            elements,
            registry: Rc::new(RefCell::new(CustomValidationRegistry::new())),
            queue: AsyncQueue::new(),
        }
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn registry(&self) -> &RefCell<CustomValidationRegistry> {
        &self.registry
    }

    pub fn queue(&self) -> &AsyncQueue {
        &self.queue
    }

    /// Validate one element. Async rules are queued only when native
    /// constraints and every sync rule pass; the return value is the
    /// synchronous verdict.
    pub fn validate_input(&self, el: NodeId) -> bool {
        ErrorPresenter::clear(&mut *self.host.borrow_mut(), el);

        let entry = ValidationSetEntry::for_element(&*self.host.borrow(), el);
        if let Some(entry) = entry {
            NativeConstraintChecker::report(&mut *self.host.borrow_mut(), &[entry]);
            tracing::debug!("{} fails native constraints", el);
            return false;
        }

        let rules = self.registry.borrow().entries_for(el);
        let valid = self.run_sync(&rules, &[]);
        if valid {
            let async_rules = self.registry.borrow().async_entries_for(el);
            self.queue_async(async_rules, Vec::new());
        }

        tracing::debug!("validate_input {}: {}", el, valid);
        valid
    }

    /// Validate the whole form: native pass over visible controls, then
    /// every sync rule, then every async rule as one chain.
    pub fn validate_form(&self) -> bool {
        {
            let mut host = self.host.borrow_mut();
            for &el in &self.elements {
                ErrorPresenter::clear(&mut *host, el);
            }
            StateTagger::set(&mut *host, self.form, State::Submitted);
        }

        let mut reported = Vec::new();
        let native_valid = if self.host.borrow().check_form_validity(self.form) {
            true
        } else {
            let entries = NativeConstraintChecker::collect_failures(&*self.host.borrow(), &self.elements);
            reported = entries.iter().map(|e| e.element).collect();
            NativeConstraintChecker::report(&mut *self.host.borrow_mut(), &entries)
        };

        let rules = self.registry.borrow().sync_rules().to_vec();
        let custom_valid = self.run_sync(&rules, &reported);

        let async_rules = self.registry.borrow().async_rules().to_vec();
        self.queue_async(async_rules, reported.clone());

        tracing::debug!(
            "validate_form {}: native={} custom={} ({} native failures)",
            self.form, native_valid, custom_valid, reported.len()
        );
        native_valid && custom_valid
    }

    /// Clear every error and every interaction state
    pub fn remove_validations(&self) {
        let mut host = self.host.borrow_mut();
        for &el in &self.elements {
            ErrorPresenter::clear(&mut *host, el);
            StateTagger::reset(&mut *host, el);
        }
        StateTagger::clear(&mut *host, self.form, State::Submitted);
    }

    /// `change`: mark dirty
    pub fn on_change(&self, el: NodeId) {
        StateTagger::set(&mut *self.host.borrow_mut(), el, State::Dirty);
    }

    /// `blur`: mark visited; a dirty element is validated and its dirty
    /// flag consumed, so it is not re-validated until it changes again.
    pub fn on_blur(&self, el: NodeId) -> Option<bool> {
        let dirty = {
            let mut host = self.host.borrow_mut();
            StateTagger::set(&mut *host, el, State::Visited);
            let dirty = StateTagger::has(&*host, el, State::Dirty);
            if dirty {
                StateTagger::clear(&mut *host, el, State::Dirty);
            }
            dirty
        };

        dirty.then(|| self.validate_input(el))
    }

    /// Run sync rules in order, stopping at the first failure.
    ///
    /// A passing rule clears its target, except targets in `keep` (native
    /// failures reported earlier in the same pass).
    fn run_sync(&self, rules: &[Rc<SyncRule>], keep: &[NodeId]) -> bool {
        for rule in rules {
            let outcome = rule.run();
            tracing::trace!("rule on {}: {:?}", rule.source(), outcome);

            match outcome.failure_message(rule.error_message()) {
                Some(message) => {
                    rule.set_failed(true);
                    show_failure(&mut *self.host.borrow_mut(), rule.target(), message);
                    return false;
                }
                None => {
                    rule.set_failed(false);
                    if !keep.contains(&rule.target()) {
                        ErrorPresenter::clear(&mut *self.host.borrow_mut(), rule.target());
                    }
                }
            }
        }
        true
    }

    /// Queue `rules` as one chain. A success leaves the error shown on
    /// targets in `keep` (native failures of the same pass).
    fn queue_async(&self, rules: Vec<Rc<AsyncRule>>, keep: Vec<NodeId>) {
        if rules.is_empty() {
            return;
        }

        let host = self.host.clone();
        let registry = self.registry.clone();
        let keep: Rc<[NodeId]> = keep.into();
        self.queue.enqueue(rules, move |rule| {
            let host = host.clone();
            let registry = registry.clone();
            let keep = keep.clone();
            async move {
                let settled = rule.start().await;
                match settled {
                    Ok(payload) => settle_success(&host, &registry, &rule, &keep, &payload),
                    Err(reason) => settle_failure(&host, &rule, &reason),
                }
            }
        });
    }
}

/// Show a custom-rule failure on its target
fn show_failure<H: FormHost + ?Sized>(host: &mut H, target: NodeId, message: &str) {
    ErrorPresenter::show(host, target, message);
    StateTagger::set(host, target, State::VirtuallyDirty);
}

fn settle_success<H: FormHost>(
    host: &RefCell<H>,
    registry: &RefCell<CustomValidationRegistry>,
    rule: &AsyncRule,
    keep: &[NodeId],
    payload: &str,
) {
    let target = rule.target();
    {
        let mut host = host.borrow_mut();
        if !keep.contains(&target) {
            ErrorPresenter::clear(&mut *host, target);
        }
        StateTagger::set(&mut *host, rule.source(), State::Dirty);
        StateTagger::set(&mut *host, rule.source(), State::Visited);
    }
    registry.borrow().reset_failures(target);
    rule.set_failed(false);

    tracing::trace!("async rule on {} resolved", rule.source());
    rule.succeed(payload);
}

fn settle_failure<H: FormHost>(host: &RefCell<H>, rule: &AsyncRule, reason: &str) {
    rule.set_failed(true);

    let outcome: CheckOutcome = rule.parse_error(reason);
    if let Some(message) = outcome.failure_message(rule.error_message()).filter(|m| !m.is_empty()) {
        show_failure(&mut *host.borrow_mut(), rule.target(), message);
    }

    if !rule.fail(reason) {
        tracing::debug!("async rule on {} rejected without failure callback: {}", rule.source(), reason);
    }
}
